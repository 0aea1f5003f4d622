//! Structural equality modulo renaming of bound variables, and sub-term counting.
//!
//! Two binders are compared by pairing up their bound variables with a fresh tag, and then
//! comparing their children. Inside the children, two bound variables are equal if they carry the
//! same tag, regardless of their names. The tags live in a side table owned by the comparison,
//! with one scope pushed per binder, so they can never outlive the comparison that created them.

use super::{Session, StaleSessionAccess, TermId};
use crate::utils::HashMapStack;

/// The tags given to paired bound variables, one table for each side of a comparison.
#[derive(Debug, Default)]
pub(crate) struct BoundVarTags {
    left: HashMapStack<TermId, u64>,
    right: HashMapStack<TermId, u64>,
}

impl BoundVarTags {
    pub(crate) fn push(&mut self, left_var: TermId, right_var: TermId, tag: u64) {
        self.left.push_scope();
        self.right.push_scope();
        self.left.insert(left_var, tag);
        self.right.insert(right_var, tag);
    }

    pub(crate) fn pop(&mut self) {
        self.left.pop_scope();
        self.right.pop_scope();
    }

    pub(crate) fn left(&self, var: TermId) -> Option<u64> {
        self.left.get(&var).copied()
    }

    pub(crate) fn right(&self, var: TermId) -> Option<u64> {
        self.right.get(&var).copied()
    }

    /// Returns `true` if no tag is currently assigned.
    pub(crate) fn is_clear(&self) -> bool {
        self.left.height() == 1 && self.left.is_empty() && self.right.height() == 1 && self.right.is_empty()
    }
}

/// A comparator for alpha-aware equality.
///
/// A single comparator can be used for several comparisons; every binder scope it opens is
/// closed before the comparison of that binder returns, whatever the outcome.
pub struct Comparator<'s> {
    session: &'s Session,
    tags: BoundVarTags,
}

impl<'s> Comparator<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session, tags: BoundVarTags::default() }
    }

    /// Returns `true` if no bound variable is tagged. This holds between any two calls to
    /// [`Comparator::eq`].
    pub fn is_clear(&self) -> bool {
        self.tags.is_clear()
    }

    pub fn eq(&mut self, a: TermId, b: TermId) -> bool {
        let session = self.session;
        if a == b {
            return true;
        }
        // An untyped side stops the recursion, and is equal to anything
        if session.is_no_type(a) || session.is_no_type(b) {
            return true;
        }
        let (term_a, term_b) = (&session[a], &session[b]);
        match (term_a.is_bound(), term_b.is_bound()) {
            (true, true) => return self.bound_vars_eq(a, b),
            (false, false) => (),
            _ => return false,
        }
        if (term_a.kind, term_a.name(), term_a.value()) != (term_b.kind, term_b.name(), term_b.value())
        {
            return false;
        }
        if !self.eq(term_a.math_type, term_b.math_type) {
            return false;
        }
        if term_a.children.len() != term_b.children.len() {
            return false;
        }

        let binds = session.has_bound_var(a) && session.has_bound_var(b);
        if binds {
            let tag = session.mint_tag();
            self.tags.push(term_a.children[1], term_b.children[1], tag);
        }
        let result = term_a
            .children
            .iter()
            .zip(&term_b.children)
            .all(|(&x, &y)| self.eq(x, y));
        if binds {
            self.tags.pop();
        }
        result
    }

    fn bound_vars_eq(&self, a: TermId, b: TermId) -> bool {
        match (self.tags.left(a), self.tags.right(b)) {
            (Some(x), Some(y)) => x == y,
            // Outside of any tagging context, fall back to comparing names. This is only an
            // approximation for isolated bound variables.
            _ => self.session[a].name() == self.session[b].name(),
        }
    }
}

impl Session {
    /// Compares two terms for structural equality modulo renaming of bound variables.
    ///
    /// The `NO_TYPE` sentinel is equal to every term. This makes the relation non-transitive once
    /// an untyped term takes part in a chain of comparisons.
    pub fn equals(&self, a: TermId, b: TermId) -> Result<bool, StaleSessionAccess> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.equals_unchecked(a, b))
    }

    pub(crate) fn equals_unchecked(&self, a: TermId, b: TermId) -> bool {
        Comparator::new(self).eq(a, b)
    }

    /// Counts the sub-terms of `haystack`, itself included, that are equal to `needle`.
    ///
    /// The `NO_TYPE` sentinel contains nothing.
    pub fn contains(&self, haystack: TermId, needle: TermId) -> Result<usize, StaleSessionAccess> {
        self.check(haystack)?;
        self.check(needle)?;
        let mut comp = Comparator::new(self);
        Ok(self.count_occurrences(&mut comp, haystack, needle))
    }

    fn count_occurrences(&self, comp: &mut Comparator, haystack: TermId, needle: TermId) -> usize {
        if self.is_no_type(haystack) {
            return 0;
        }
        let here = usize::from(comp.eq(haystack, needle));
        here + self[haystack]
            .children
            .iter()
            .map(|&child| self.count_occurrences(comp, child, needle))
            .sum::<usize>()
    }
}
