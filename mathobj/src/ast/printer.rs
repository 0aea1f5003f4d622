//! A compact s-expression rendering of terms, used in logs and by the command line tool.

use super::{Session, TermId};
use std::fmt;

/// Displays a term as an s-expression. Named terms and literals are printed as their name or
/// value, and every other node as `(KIND child...)`.
pub struct TermDisplay<'a> {
    session: &'a Session,
    id: TermId,
}

impl Session {
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { session: self, id }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Ok(term) = self.session.get(self.id) else {
            return write!(f, "<stale {:?}>", self.id);
        };
        // Sequence variables carry a placeholder shape that is only meant for display in the
        // context, so they are printed by name like any other variable
        if let Some(name) = term.name() {
            return write!(f, "{}", name);
        }
        if let Some(value) = term.value() {
            return write!(f, "{}", value);
        }
        if term.children.is_empty() {
            return write!(f, "{}", term.kind);
        }
        write!(f, "({}", term.kind)?;
        for &child in &term.children {
            write!(f, " {}", self.session.display(child))?;
        }
        write!(f, ")")
    }
}
