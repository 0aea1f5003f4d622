//! The error types for term construction and session access.

use super::NodeKind;
use thiserror::Error;

/// A record that does not have the shape its node kind requires. Nothing is added to the session
/// when construction fails with this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// A record of this kind must carry the given attribute.
    #[error("'{kind}' record is missing the '{attribute}' attribute")]
    MissingAttribute {
        kind: NodeKind,
        attribute: &'static str,
    },

    /// The number of children does not match the arity of the node kind.
    #[error("'{kind}' record expects {expected} children, got {got}")]
    WrongArity {
        kind: NodeKind,
        expected: usize,
        got: usize,
    },

    /// An application record needs a function and at least one argument.
    #[error("application record expects at least 2 children, got {0}")]
    ApplicationArity(usize),

    /// The middle child of a binder record must be a bound variable.
    #[error("middle child of '{0}' record is not a bound variable")]
    NotABoundVariable(NodeKind),
}

/// A term handle from a cleared or foreign session was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("term handle from session generation {found} used in generation {current}")]
pub struct StaleSessionAccess {
    pub found: u32,
    pub current: u32,
}
