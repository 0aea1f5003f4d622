//! The types for parser errors.

use crate::{ast::MalformedRecord, parser::Token};
use thiserror::Error;

/// The error type for the parser.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The lexer encountered the end of the input while reading a string literal.
    #[error("unexpected EOF in string literal")]
    EofInString,

    /// The parser encountered an unexpected token.
    #[error("unexpected token: '{0}'")]
    UnexpectedToken(Token),

    /// The symbol in node kind position is not a known node kind.
    #[error("unknown node kind: '{0}'")]
    UnknownNodeKind(String),

    #[error("unknown attribute: ':{0}'")]
    UnknownAttribute(String),

    #[error("attribute ':{0}' given twice")]
    DuplicateAttribute(String),

    #[error("unknown entry: '{0}'")]
    UnknownEntry(String),

    /// A well-formed entry appeared in a stream where it is not allowed, e.g. a target in the
    /// hypotheses stream.
    #[error("'{0}' entry is not allowed in this stream")]
    UnexpectedEntry(String),

    /// The record read does not have the shape its node kind requires.
    #[error("{0}")]
    Malformed(#[from] MalformedRecord),
}
