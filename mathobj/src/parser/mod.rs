//! A reader for the record stream format, in which the front-end hands over already decomposed
//! `(kind, attributes, children)` records.
//!
//! ```text
//! (object (LOCAL_CONSTANT :name "f" :identifier "0.f" :type (FUNCTION X Y)))
//! (target (QUANT_∀ :type PROP X (LOCAL_CONSTANT :name "x.BoundVar" :identifier "x") ...))
//! ```

mod error;
mod lexer;
pub(crate) mod tests;

pub use error::ParserError;
pub use lexer::{Lexer, Position, Token};

use crate::{
    ast::{NodeKind, NodeRecord, Session, TermId},
    definitions::Definition,
    Error, MathObjResult,
};
use std::{io::BufRead, str::FromStr};

/// One top-level entry of a record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A context object, e.g. `f : X → Y`. The term is the head of the entry, and its type is
    /// what it denotes.
    Object(TermId),

    /// A context property, e.g. `H : x ∈ A`.
    Property(TermId),

    /// A goal. The term is the proposition to prove.
    Target(TermId),

    Definition(Definition),
}

impl Entry {
    /// The header this entry is introduced with.
    pub fn header(&self) -> &'static str {
        match self {
            Entry::Object(_) => "object",
            Entry::Property(_) => "property",
            Entry::Target(_) => "target",
            Entry::Definition(_) => "definition",
        }
    }
}

/// Reads every entry of a record stream, constructing its terms in `session`.
pub fn parse_entries<R: BufRead>(session: &mut Session, input: R) -> MathObjResult<Vec<Entry>> {
    Parser::new(session, input)?.parse_entries()
}

/// A parser for the record stream format.
pub struct Parser<'s, R> {
    session: &'s mut Session,
    lexer: Lexer<R>,
    current_token: Token,
    current_position: Position,
}

impl<'s, R: BufRead> Parser<'s, R> {
    /// Constructs a new `Parser` from a type that implements `BufRead`.
    ///
    /// This operation can fail if there is an IO or lexer error on the first token.
    pub fn new(session: &'s mut Session, input: R) -> MathObjResult<Self> {
        let mut lexer = Lexer::new(input)?;
        let (current_token, current_position) = lexer.next_token()?;
        Ok(Parser {
            session,
            lexer,
            current_token,
            current_position,
        })
    }

    /// Advances the parser one token, and returns the previous `current_token`.
    fn next_token(&mut self) -> MathObjResult<(Token, Position)> {
        use std::mem::replace;

        let (new_token, new_position) = self.lexer.next_token()?;
        let old_token = replace(&mut self.current_token, new_token);
        let old_position = replace(&mut self.current_position, new_position);
        Ok((old_token, old_position))
    }

    fn expect_token(&mut self, expected: Token) -> MathObjResult<()> {
        let (got, pos) = self.next_token()?;
        if got == expected {
            Ok(())
        } else {
            Err(Error::Parser(ParserError::UnexpectedToken(got), pos))
        }
    }

    fn expect_symbol(&mut self) -> MathObjResult<String> {
        match self.next_token()? {
            (Token::Symbol(s), _) => Ok(s),
            (other, pos) => Err(Error::Parser(ParserError::UnexpectedToken(other), pos)),
        }
    }

    fn expect_string(&mut self) -> MathObjResult<String> {
        match self.next_token()? {
            (Token::String(s), _) => Ok(s),
            (other, pos) => Err(Error::Parser(ParserError::UnexpectedToken(other), pos)),
        }
    }

    /// Calls `parse_func` repeatedly until a closing parenthesis is reached. This method consumes
    /// the ending `)` token.
    fn parse_sequence<T, F>(&mut self, mut parse_func: F) -> MathObjResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> MathObjResult<T>,
    {
        let mut result = Vec::new();
        while self.current_token != Token::CloseParen {
            result.push(parse_func(self)?);
        }
        self.next_token()?; // Consume `)` token
        Ok(result)
    }

    /// Reads entries until the end of the input.
    pub fn parse_entries(&mut self) -> MathObjResult<Vec<Entry>> {
        let mut entries = Vec::new();
        while let Some((entry, _)) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Reads the next entry together with the position it starts at, or returns `None` at the end
    /// of the input.
    pub fn next_entry(&mut self) -> MathObjResult<Option<(Entry, Position)>> {
        if self.current_token == Token::Eof {
            return Ok(None);
        }
        let position = self.current_position;
        self.parse_entry().map(|entry| Some((entry, position)))
    }

    /// Reads a single entry, e.g. `(object <term>)` or `(definition :name "..." <term>)`.
    pub fn parse_entry(&mut self) -> MathObjResult<Entry> {
        self.expect_token(Token::OpenParen)?;
        let position = self.current_position;
        let header = self.expect_symbol()?;
        let entry = match header.as_str() {
            "object" => Entry::Object(self.parse_term()?),
            "property" => Entry::Property(self.parse_term()?),
            "target" => Entry::Target(self.parse_term()?),
            "definition" => Entry::Definition(self.parse_definition()?),
            _ => return Err(Error::Parser(ParserError::UnknownEntry(header), position)),
        };
        self.expect_token(Token::CloseParen)?;
        Ok(entry)
    }

    fn parse_definition(&mut self) -> MathObjResult<Definition> {
        let mut name = None;
        let mut implicit = false;
        while let Token::Keyword(keyword) = &self.current_token {
            let (keyword, position) = (keyword.clone(), self.current_position);
            self.next_token()?;
            match keyword.as_str() {
                "name" if name.is_none() => name = Some(self.expect_string()?),
                "implicit" if !implicit => implicit = true,
                "name" | "implicit" => {
                    return Err(Error::Parser(ParserError::DuplicateAttribute(keyword), position))
                }
                _ => return Err(Error::Parser(ParserError::UnknownAttribute(keyword), position)),
            }
        }
        let Some(name) = name else {
            let e = ParserError::UnexpectedToken(self.current_token.clone());
            return Err(Error::Parser(e, self.current_position));
        };
        let statement = self.parse_term()?;
        Ok(Definition { name, statement, implicit })
    }

    fn parse_kind(&mut self) -> MathObjResult<NodeKind> {
        // The `not provided` kind has a space in its name, so it can only be written as a string
        let (token, position) = self.next_token()?;
        let symbol = match token {
            Token::Symbol(s) | Token::String(s) => s,
            other => return Err(Error::Parser(ParserError::UnexpectedToken(other), position)),
        };
        NodeKind::from_str(&symbol)
            .map_err(|()| Error::Parser(ParserError::UnknownNodeKind(symbol), position))
    }

    /// Reads a term, e.g. `PROP` or `(LOCAL_CONSTANT :name "x" :identifier "0.x" :type X)`, and
    /// constructs it in the session.
    pub fn parse_term(&mut self) -> MathObjResult<TermId> {
        let position = self.current_position;
        if self.current_token != Token::OpenParen {
            let kind = self.parse_kind()?;
            return self.construct(NodeRecord::new(kind), position);
        }
        self.next_token()?; // Consume `(`
        let kind = self.parse_kind()?;
        let mut record = NodeRecord::new(kind);
        while let Token::Keyword(keyword) = &self.current_token {
            let (keyword, attr_position) = (keyword.clone(), self.current_position);
            self.next_token()?;
            self.parse_attribute(&mut record, keyword, attr_position)?;
        }
        record.children = self.parse_sequence(Self::parse_term)?;
        self.construct(record, position)
    }

    fn parse_attribute(
        &mut self,
        record: &mut NodeRecord,
        keyword: String,
        position: Position,
    ) -> MathObjResult<()> {
        if keyword == "type" {
            if record.math_type.is_some() {
                return Err(Error::Parser(ParserError::DuplicateAttribute(keyword), position));
            }
            record.math_type = Some(self.parse_term()?);
            return Ok(());
        }
        let info = &mut record.info;
        let slot = match keyword.as_str() {
            "name" => &mut info.name,
            "identifier" => &mut info.identifier,
            "value" => &mut info.value,
            "lean_name" => &mut info.lean_name,
            "pp_type" => &mut info.pp_type,
            _ => return Err(Error::Parser(ParserError::UnknownAttribute(keyword), position)),
        };
        if slot.is_some() {
            return Err(Error::Parser(ParserError::DuplicateAttribute(keyword), position));
        }
        *slot = Some(self.expect_string()?);
        Ok(())
    }

    fn construct(&mut self, record: NodeRecord, position: Position) -> MathObjResult<TermId> {
        self.session.construct(record).map_err(|e| match e {
            Error::Malformed(m) => Error::Parser(ParserError::Malformed(m), position),
            other => other,
        })
    }
}
