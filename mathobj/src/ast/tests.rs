use super::*;
use crate::{parser::tests::*, Config, Error};

fn local(session: &mut Session, name: &str, math_type: TermId) -> TermId {
    let record = NodeRecord::new(NodeKind::LocalConstant)
        .name(name)
        .identifier(format!("0.{}", name))
        .math_type(math_type);
    session.construct(record).unwrap()
}

fn node(session: &mut Session, kind: NodeKind, children: Vec<TermId>) -> TermId {
    let prop = session.prop();
    let record = NodeRecord::new(kind).children(children).math_type(prop);
    session.construct(record).unwrap()
}

/// `X : TYPE`, and `A`, `B` subsets of `X`.
fn sets(session: &mut Session) -> [TermId; 3] {
    let type_ = session.construct(NodeRecord::new(NodeKind::Type)).unwrap();
    let x = local(session, "X", type_);
    let set_x = session
        .construct(NodeRecord::new(NodeKind::Set).children(vec![x]))
        .unwrap();
    let a = local(session, "A", set_x);
    let b = local(session, "B", set_x);
    [x, a, b]
}

#[test]
fn test_uncurrying() {
    let mut s = Session::default();
    let type_ = parse_term(&mut s, "TYPE");
    let [f, x, y] = ["f", "x", "y"].map(|n| local(&mut s, n, type_));

    let app = |s: &mut Session, children| {
        s.construct(NodeRecord::new(NodeKind::Application).children(children))
            .unwrap()
    };
    let inner = app(&mut s, vec![f, x]);
    let curried = app(&mut s, vec![inner, y]);
    let flat = app(&mut s, vec![f, x, y]);
    assert_eq!(s[curried].children, [f, x, y]);
    assert_eq!(s[curried].children, s[flat].children);
    assert!(s.equals(curried, flat).unwrap());
}

#[test]
fn test_registry_dedup() {
    let mut s = Session::default();
    let type_ = parse_term(&mut s, "TYPE");
    let first = local(&mut s, "X", type_);
    let second = s
        .construct(NodeRecord::new(NodeKind::LocalConstant).name("X").identifier("0.X"))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(s.variable("0.X"), Some(first));

    let [c1, c2] = parse_terms(&mut s, ["(CONSTANT :name \"injective\")"; 2]);
    assert_eq!(c1, c2);
    assert_eq!(s.constant("injective"), Some(c1));
    assert_eq!(s.constants().count(), 1);
}

#[test]
fn test_number_domains() {
    use NumberDomain::*;

    let mut s = Session::default();
    assert_eq!(s.largest_number_domain(), None);
    for name in ["ℝ", "ℕ", "ℚ", "ℤ", "ℕ"] {
        s.construct(NodeRecord::new(NodeKind::Constant).name(name))
            .unwrap();
    }
    assert_eq!(s.number_domains(), [Naturals, Integers, Rationals, Reals]);
    assert_eq!(s.largest_number_domain(), Some(Reals));
}

#[test]
fn test_alpha_equality() {
    let mut s = Session::default();
    let x_type = r#"(LOCAL_CONSTANT :name "X" :identifier "0.X" :type TYPE)"#;
    let quantified = |var_a: &str, var_b: &str, swap: bool| {
        let (l, r) = if swap { (var_b, var_a) } else { (var_a, var_b) };
        let bv = |id: &str| format!(r#"(LOCAL_CONSTANT :name "{id}.BoundVar" :identifier "{id}")"#);
        format!(
            "(QUANT_∀ :type PROP {x} {a} (QUANT_∃ :type PROP {x} {b} (PROP_EQUAL :type PROP {l} {r})))",
            x = x_type,
            a = bv(var_a),
            b = bv(var_b),
            l = bv(l),
            r = bv(r),
        )
    };
    let inputs = [
        quantified("a", "b", false),
        quantified("c", "d", false),
        quantified("e", "f", true),
    ];
    let [first, renamed, swapped] = parse_terms(&mut s, inputs.each_ref().map(String::as_str));
    assert_ne!(first, renamed);
    assert!(s.equals(first, renamed).unwrap());
    assert!(!s.equals(first, swapped).unwrap());

    let mut comp = Comparator::new(&s);
    assert!(comp.eq(first, renamed));
    assert!(!comp.eq(renamed, swapped));
    assert!(comp.is_clear());
}

#[test]
fn test_reflexivity() {
    let mut s = Session::default();
    let [_, a, b] = sets(&mut s);
    let union = node(&mut s, NodeKind::SetUnion, vec![a, b]);
    let terms = [s.no_type(), s.prop(), a, union];

    let mut comp = Comparator::new(&s);
    for t in terms {
        assert!(comp.eq(t, t));
        assert!(comp.is_clear());
    }
}

#[test]
fn test_no_type_is_absorbing() {
    let mut s = Session::default();
    let [x, a, _] = sets(&mut s);
    assert!(s.equals(s.no_type(), a).unwrap());
    assert!(s.equals(x, s.no_type()).unwrap());
    assert!(!s.equals(x, a).unwrap());
}

#[test]
fn test_contains() {
    let mut s = Session::default();
    let [x, a, b] = sets(&mut s);
    let inter = node(&mut s, NodeKind::SetInter, vec![a, b]);
    let union = node(&mut s, NodeKind::SetUnion, vec![inter, a]);

    assert_eq!(s.contains(union, a).unwrap(), 2);
    assert_eq!(s.contains(union, b).unwrap(), 1);
    assert_eq!(s.contains(union, union).unwrap(), 1);
    assert_eq!(s.contains(inter, x).unwrap(), 0);
    assert_eq!(s.contains(s.no_type(), a).unwrap(), 0);
    assert_eq!(s.contains(s.no_type(), s.no_type()).unwrap(), 0);
}

#[test]
fn test_stale_handles() {
    let mut s = Session::default();
    let [_, a, b] = sets(&mut s);
    let old_generation = s.generation();
    s.clear();
    assert_ne!(s.generation(), old_generation);
    assert!(s.variable("0.A").is_none());

    let err = s.equals(a, b).unwrap_err();
    assert_eq!(err.found, old_generation);
    assert_eq!(err.current, s.generation());
    assert!(s.contains(a, b).is_err());
    assert!(s.get(a).is_err());

    let record = NodeRecord::new(NodeKind::SetUnion).children(vec![a, b]);
    assert!(matches!(s.construct(record), Err(Error::StaleSession(_))));

    // Handles from another session are rejected as well
    let mut other = Session::default();
    let [_, c, _] = sets(&mut other);
    assert!(s.equals(c, c).is_err());
}

#[test]
fn test_malformed_records_are_not_added() {
    let mut s = Session::default();
    let [x, a, b] = sets(&mut s);
    let before = s.len();

    let bad = [
        NodeRecord::new(NodeKind::Belongs).children(vec![a]),
        NodeRecord::new(NodeKind::Constant),
        NodeRecord::new(NodeKind::LocalConstant).identifier("0.nameless"),
        NodeRecord::new(NodeKind::Application).children(vec![a]),
        NodeRecord::new(NodeKind::ForAll).children(vec![x, a, b]),
    ];
    for record in bad {
        assert!(matches!(s.construct(record), Err(Error::Malformed(_))));
    }
    assert_eq!(s.len(), before);
    assert!(s.variable("0.nameless").is_none());
}

#[test]
fn test_sequence_shapes() {
    let mut s = Session::default();
    let [u, v] = parse_terms(
        &mut s,
        [
            r#"(LOCAL_CONSTANT :name "u" :identifier "0.u" :type (SEQUENCE (CONSTANT :name "ℕ") (CONSTANT :name "ℝ")))"#,
            r#"(LOCAL_CONSTANT :name "v" :identifier "0.v" :type (SEQUENCE (CONSTANT :name "ℕ") (CONSTANT :name "ℝ")))"#,
        ],
    );
    assert_eq!(s[u].children.len(), 3);
    let var = s.bound_var(u).unwrap();
    assert_eq!(s[var].parent(), Some(u));
    assert_eq!(s.which_number_set(var, false), Some(NumberDomain::Naturals));
    assert_eq!(s[u].children[2], s.prop());

    let equality = r#"(PROP_EQUAL :type PROP
        (LOCAL_CONSTANT :name "u" :identifier "0.u")
        (LOCAL_CONSTANT :name "v" :identifier "0.v"))"#;
    let [first, second] = parse_terms(&mut s, [equality, equality]);
    let lambda = s[first].children[0];
    assert!(s.is_lambda(lambda, true));
    let body = s.body(lambda).unwrap();
    assert_eq!(s[body].children[0], u);
    assert_eq!(s.number_domain(s[body].math_type), Some(NumberDomain::Reals));

    // The expansions use distinct bound variables, but are alpha-equivalent
    assert_ne!(s.bound_var(lambda), s.bound_var(s[second].children[0]));
    assert!(s.equals(first, second).unwrap());
    assert_eq!(s.contains(first, v).unwrap(), 1);
}

#[test]
fn test_connective_predicates() {
    let mut s = Session::default();
    let [x, a, b] = sets(&mut s);
    let prop = s.prop();
    let p = local(&mut s, "P", prop);
    let q = local(&mut s, "Q", prop);
    let and = node(&mut s, NodeKind::And, vec![p, q]);
    let implies = node(&mut s, NodeKind::Implies, vec![p, q]);
    let var = s.new_bound_var(x, None);
    let forall = node(&mut s, NodeKind::ForAll, vec![x, var, implies]);
    let h = local(&mut s, "H", forall);

    assert!(s.is_and(and, true, false));
    assert!(!s.is_or(and, true, false));
    assert!(s.is_implication(implies, true, true));
    assert!(s.is_for_all(h, false, false));
    assert!(s.is_for_all(forall, true, false));
    assert!(!s.is_exists(forall, true, true));
    assert!(s.is_quantifier(h, false));
    assert!(s.can_be_used_for_implication(h, false, false));
    assert!(!s.can_be_used_for_implication(and, true, false));
    assert_eq!(s.premise(implies, true), Some(p));
    assert_eq!(s.bound_vars(forall, None), [var]);
    assert!(s.bound_vars(forall, Some(a)).is_empty());

    assert!(s.is_prop(p, false));
    assert!(s.is_variable(a, true));
    assert!(!s.is_variable(h, true));
    assert!(!s.is_variable(x, true));
    assert!(s.is_type(x, false));
    let belongs = node(&mut s, NodeKind::Belongs, vec![var, a]);
    assert!(s.is_atomic_belong(belongs, true));
    let union = node(&mut s, NodeKind::SetUnion, vec![a, b]);
    let belongs_union = node(&mut s, NodeKind::Belongs, vec![var, union]);
    assert!(!s.is_atomic_belong(belongs_union, true));
}

#[test]
fn test_negation_predicates() {
    let mut s = Session::default();
    let [_, a, b] = sets(&mut s);
    let eq = node(&mut s, NodeKind::Equal, vec![a, b]);
    let not_eq = node(&mut s, NodeKind::NotEqual, vec![a, b]);
    let not = node(&mut s, NodeKind::Not, vec![eq]);

    assert!(s.is_set_equality(eq, true));
    assert!(s.is_non_equality(not_eq, true));
    assert!(s.is_inequality(not_eq, true));
    assert!(s.is_not(not, true));
    assert!(s.is_not(not_eq, true));
    assert_eq!(s.body_of_negation(not), Some(eq));
    assert!(!s.is_false(not, true));
}

#[test]
fn test_local_context_and_naming() {
    let mut s = Session::default();
    let target = parse_term(
        &mut s,
        r#"(QUANT_∀ :type PROP
            (LOCAL_CONSTANT :name "X" :identifier "0.X" :type TYPE)
            (LOCAL_CONSTANT :name "x.BoundVar" :identifier "_x")
            (QUANT_∃ :type PROP
                (LOCAL_CONSTANT :name "X" :identifier "0.X")
                (LOCAL_CONSTANT :name "y.BoundVar" :identifier "_y")
                (PROP_EQUAL :type PROP
                    (LOCAL_CONSTANT :name "x.BoundVar" :identifier "_x")
                    (LOCAL_CONSTANT :name "y.BoundVar" :identifier "_y"))))"#,
    );
    let outer = s.bound_var(target).unwrap();
    let exists = s.body(target).unwrap();
    let inner = s.bound_var(exists).unwrap();

    s.propagate_local_context(target);
    assert!(s[outer].local_context().is_empty());
    assert_eq!(s[inner].local_context(), [outer]);

    s.name_bound_vars(target);
    assert_eq!(s[outer].name(), Some("x"));
    assert_eq!(s[inner].name(), Some("x'"));
    assert!(!s[outer].is_unnamed());
    assert_eq!(s.display(exists).to_string(), "(QUANT_∃ X x' (PROP_EQUAL x x'))");
}

#[test]
fn test_parallel_binders() {
    let binder = |var: &str| {
        format!(
            r#"(QUANT_∃ :type PROP
                (LOCAL_CONSTANT :name "X" :identifier "0.X" :type TYPE)
                (LOCAL_CONSTANT :name "{var}.BoundVar" :identifier "_{var}")
                (PROP_EQUAL :type PROP
                    (LOCAL_CONSTANT :name "{var}.BoundVar" :identifier "_{var}")
                    (LOCAL_CONSTANT :name "{var}.BoundVar" :identifier "_{var}")))"#
        )
    };
    let input = format!("(PROP_AND :type PROP {} {})", binder("a"), binder("b"));

    // Siblings never share a name, whether their contexts are independent or not
    for independent in [true, false] {
        let mut s = Session::new(Config::new().independent_local_contexts(independent));
        let and = parse_term(&mut s, &input);
        let [left, right] = [0, 1].map(|i| s.bound_var(s[and].children[i]).unwrap());
        s.propagate_local_context(and);
        assert!(s[left].local_context().is_empty());
        assert_eq!(s[right].local_context().is_empty(), independent);

        s.name_bound_vars(and);
        assert_eq!(s[left].name(), Some("x"));
        assert_eq!(s[right].name(), Some("x'"));
    }
}

#[test]
fn test_naming_avoids_globals() {
    let mut s = Session::new(Config::new().use_type_name_as_hint(false));
    let target = parse_term(
        &mut s,
        r#"(QUANT_∀ :type PROP
            (CONSTANT :name "ℕ")
            (LOCAL_CONSTANT :name "k.BoundVar" :identifier "_k")
            (PROP_≤ :type PROP
                (LOCAL_CONSTANT :name "k" :identifier "0.k" :type (CONSTANT :name "ℕ"))
                (LOCAL_CONSTANT :name "k.BoundVar" :identifier "_k")))"#,
    );
    let var = s.bound_var(target).unwrap();
    assert_eq!(s.preferred_letter(var), "k");

    s.propagate_local_context(target);
    s.name_bound_vars(target);
    assert_eq!(s[var].name(), Some("k'"));
}
