//! The term model: terms, bound variables and the session that owns them, together with the
//! algorithms that inspect and compare terms.

#[macro_use]
mod macros;
mod builder;
mod equality;
mod error;
mod kind;
mod naming;
mod predicates;
mod printer;
mod session;
mod term;

#[cfg(test)]
mod tests;

pub use builder::NodeRecord;
pub use equality::Comparator;
pub(crate) use equality::BoundVarTags;
pub use error::{MalformedRecord, StaleSessionAccess};
pub use kind::{NodeKind, NumberDomain};
pub use predicates::Connective;
pub use printer::TermDisplay;
pub use session::Session;
pub use term::{BoundVar, Info, Term, TermId, BOUND_VAR_SUFFIX, NO_NAME, UNNAMED};
