//! In addition to the parser tests, this module contains some parsing functions that can be
//! useful in tests, and are intended to be used in other modules.
#![cfg(test)]

use super::*;
use crate::ast::{MalformedRecord, NodeKind, UNNAMED};

const ERROR_MESSAGE: &str = "parser error during test";

pub fn parse_term(session: &mut Session, input: &str) -> TermId {
    Parser::new(session, input.as_bytes())
        .and_then(|mut parser| parser.parse_term())
        .expect(ERROR_MESSAGE)
}

pub fn parse_terms<const N: usize>(session: &mut Session, terms: [&str; N]) -> [TermId; N] {
    terms.map(|s| parse_term(session, s))
}

pub fn parse_entries_str(session: &mut Session, input: &str) -> Vec<Entry> {
    parse_entries(session, input.as_bytes()).expect(ERROR_MESSAGE)
}

/// Tries to parse a term from a `&str`, expecting it to fail. Returns the error encountered, or
/// panics if no error is encountered.
pub fn parse_term_err(input: &str) -> Error {
    let mut session = Session::default();
    Parser::new(&mut session, input.as_bytes())
        .and_then(|mut p| p.parse_term())
        .expect_err("expected error")
}

#[test]
fn test_sentinels() {
    let mut s = Session::default();
    assert_eq!(s.prop(), parse_term(&mut s, "PROP"));
    assert_eq!(s.no_type(), parse_term(&mut s, "\"not provided\""));

    let typed_prop = parse_term(&mut s, "(PROP :name \"Prop\")");
    assert_ne!(s.prop(), typed_prop);
    assert_eq!(s[typed_prop].kind, NodeKind::Prop);
}

#[test]
fn test_attributes() {
    let mut s = Session::default();
    let x = parse_term(
        &mut s,
        r#"(LOCAL_CONSTANT :name "x" :identifier "0.x" :pp_type "X" :type
            (LOCAL_CONSTANT :name "X" :identifier "0.X" :type TYPE))"#,
    );
    let term = &s[x];
    assert_eq!(term.kind, NodeKind::LocalConstant);
    assert_eq!(term.name(), Some("x"));
    assert_eq!(term.info.pp_type.as_deref(), Some("X"));
    assert!(!term.is_bound());

    let big_x = s.variable("0.X").unwrap();
    assert_eq!(term.math_type, big_x);
    assert_eq!(s[s[big_x].math_type].kind, NodeKind::Type);

    let n = parse_term(&mut s, r#"(NUMBER :value "3" :type (CONSTANT :name "ℕ"))"#);
    assert_eq!(s[n].value(), Some("3"));
}

#[test]
fn test_identifiers_are_shared() {
    let mut s = Session::default();
    let [a, b] = parse_terms(
        &mut s,
        [
            r#"(LOCAL_CONSTANT :name "A" :identifier "0.A" :type (SET (LOCAL_CONSTANT :name "X" :identifier "0.X")))"#,
            r#"(LOCAL_CONSTANT :name "A" :identifier "0.A")"#,
        ],
    );
    assert_eq!(a, b);
    assert_eq!(s[a].kind, NodeKind::LocalConstant);
}

#[test]
fn test_bound_var_suffix() {
    let mut s = Session::default();
    let x = parse_term(
        &mut s,
        r#"(LOCAL_CONSTANT :name "x.BoundVar" :identifier "_fresh.1" :type TYPE)"#,
    );
    assert!(s[x].is_bound());
    assert!(s[x].is_unnamed());
    assert_eq!(s[x].name(), Some(UNNAMED));
    assert_eq!(s[x].info.lean_name.as_deref(), Some("x"));
}

#[test]
fn test_binders() {
    let mut s = Session::default();
    let forall = parse_term(
        &mut s,
        r#"(QUANT_∀ :type PROP
            (LOCAL_CONSTANT :name "X" :identifier "0.X" :type TYPE)
            (LOCAL_CONSTANT :name "x.BoundVar" :identifier "_x")
            (PROP_EQUAL :type PROP
                (LOCAL_CONSTANT :name "x.BoundVar" :identifier "_x")
                (LOCAL_CONSTANT :name "x.BoundVar" :identifier "_x")))"#,
    );
    let var = s.bound_var(forall).unwrap();
    assert_eq!(s[var].parent(), Some(forall));
    assert_eq!(s[var].math_type, s.variable("0.X").unwrap());
    assert_eq!(s.descendant(forall, &[2, 0]), Some(var));
    assert_eq!(s.descendant(forall, &[2, 1]), Some(var));
}

#[test]
fn test_entries() {
    let mut s = Session::default();
    let entries = parse_entries_str(
        &mut s,
        r#"
        ; a context
        (object (LOCAL_CONSTANT :name "P" :identifier "0.P" :type PROP))
        (property (LOCAL_CONSTANT :name "H" :identifier "0.H" :type
            (LOCAL_CONSTANT :name "P" :identifier "0.P")))
        (target (PROP_NOT :type PROP (LOCAL_CONSTANT :name "P" :identifier "0.P")))
        (definition :name "double negation" :implicit
            (PROP_IFF :type PROP PROP_TRUE PROP_TRUE))
        "#,
    );
    assert_eq!(entries.len(), 4);
    let headers: Vec<_> = entries.iter().map(Entry::header).collect();
    assert_eq!(headers, ["object", "property", "target", "definition"]);

    let p = s.variable("0.P").unwrap();
    assert_eq!(entries[0], Entry::Object(p));
    match &entries[3] {
        Entry::Definition(d) => {
            assert_eq!(d.name, "double negation");
            assert!(d.implicit);
            assert_eq!(s[d.statement].kind, NodeKind::Iff);
        }
        other => panic!("expected definition, got {:?}", other),
    }
}

#[test]
fn test_errors() {
    assert!(matches!(
        parse_term_err("(PROP_WHATEVER)"),
        Error::Parser(ParserError::UnknownNodeKind(k), (1, 2)) if k == "PROP_WHATEVER"
    ));
    assert!(matches!(
        parse_term_err("(CONSTANT :colour \"red\")"),
        Error::Parser(ParserError::UnknownAttribute(_), _)
    ));
    assert!(matches!(
        parse_term_err("(CONSTANT :name \"a\" :name \"b\")"),
        Error::Parser(ParserError::DuplicateAttribute(_), _)
    ));
    assert!(matches!(
        parse_term_err("(CONSTANT :name)"),
        Error::Parser(ParserError::UnexpectedToken(Token::CloseParen), _)
    ));
    assert!(matches!(
        parse_term_err("(PROP_AND PROP_TRUE)"),
        Error::Parser(
            ParserError::Malformed(MalformedRecord::WrongArity { expected: 2, got: 1, .. }),
            (1, 1),
        )
    ));
    assert!(matches!(
        parse_term_err("CONSTANT"),
        Error::Parser(ParserError::Malformed(MalformedRecord::MissingAttribute { .. }), _)
    ));

    let mut s = Session::default();
    let err = parse_entries(&mut s, "(lemma PROP)".as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Parser(ParserError::UnknownEntry(_), (1, 2))));
    assert_eq!(
        err.to_string(),
        "parser error: unknown entry: 'lemma' (on line 1, column 2)"
    );
}
