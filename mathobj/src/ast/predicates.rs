//! Classification predicates, used by the surrounding layers to decide which proof actions apply
//! to a term.
//!
//! Most predicates take an `is_math_type` flag: if it is `true`, the term itself is inspected,
//! otherwise its type is. For a context entry `H : P ∧ Q`, `is_and(H, false, ..)` and
//! `is_and(P ∧ Q, true, ..)` both hold.
//!
//! The predicates index the session directly, so they panic on a stale handle.

use super::{Info, NodeKind, NumberDomain, Session, Term, TermId};
use std::str::FromStr;

/// Constants that only appear as implicit arguments, and are never displayed.
const CONSTANT_IMPLICIT_ARGS: [&str; 1] = ["real.decidable_linear_order"];

/// The shapes that can be recognized through an implicit definition, when the configuration
/// allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// A conjunction, or an existential presented as a pair.
    And,
    Or,
    Implication,
    Exists,
    ForAll,

    /// An implication under zero or more universal quantifiers, e.g. `∀ x, P(x) ⇒ Q(x)`.
    UsableForImplication,
}

impl Connective {
    /// The direct test on a node kind. For `UsableForImplication`, this only covers the
    /// implication itself, and callers must look through universal quantifiers.
    pub(crate) fn matches_kind(self, kind: NodeKind) -> bool {
        match self {
            Connective::And => matches!(kind, NodeKind::And | NodeKind::PropExists),
            Connective::Or => kind == NodeKind::Or,
            Connective::Implication | Connective::UsableForImplication => {
                kind == NodeKind::Implies
            }
            Connective::Exists => matches!(kind, NodeKind::Exists | NodeKind::ExistsUnique),
            Connective::ForAll => kind == NodeKind::ForAll,
        }
    }

    /// Returns `true` if the test may look through a universal quantifier into its body.
    pub(crate) fn looks_through_for_all(self) -> bool {
        self == Connective::UsableForImplication
    }
}

impl Session {
    /// The term a predicate inspects: `id` itself, or its type.
    fn subject(&self, id: TermId, is_math_type: bool) -> &Term {
        if is_math_type {
            &self[id]
        } else {
            &self[self[id].math_type]
        }
    }

    fn subject_id(&self, id: TermId, is_math_type: bool) -> TermId {
        if is_math_type {
            id
        } else {
            self[id].math_type
        }
    }

    /// Evaluates a connective test on a term.
    ///
    /// If `implicit` is set and the configuration allows implicit use of definitions, a term that
    /// fails the direct test is matched against the left-hand side of every implicit definition.
    /// The test then holds if some matching definition's right-hand side passes the direct test,
    /// and that definition is recorded as the last implicit match. An untyped subject never
    /// passes through a definition.
    ///
    /// # Panics
    ///
    /// Panics if `id` is a stale handle, as do the `is_*` tests below.
    pub fn test(&self, connective: Connective, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        let subject = self.subject_id(id, is_math_type);
        if self.holds(connective, subject) {
            return true;
        }
        if !(implicit && self.config.allow_implicit_use_of_definitions) {
            return false;
        }
        self.last_implicit.replace(None);
        if self.is_no_type(subject) {
            return false;
        }
        self.implicit_match(connective, subject)
    }

    /// The direct, structural version of a connective test.
    pub(crate) fn holds(&self, connective: Connective, subject: TermId) -> bool {
        let kind = self[subject].kind;
        if connective.matches_kind(kind) {
            return true;
        }
        connective.looks_through_for_all()
            && kind == NodeKind::ForAll
            && self[subject]
                .children
                .get(2)
                .is_some_and(|&body| self.holds(connective, body))
    }

    pub fn is_and(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::And, id, is_math_type, implicit)
    }

    pub fn is_or(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::Or, id, is_math_type, implicit)
    }

    pub fn is_implication(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::Implication, id, is_math_type, implicit)
    }

    pub fn is_exists(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::Exists, id, is_math_type, implicit)
    }

    pub fn is_for_all(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::ForAll, id, is_math_type, implicit)
    }

    /// Tests whether a proposition has the shape `(∀ ...)* P ⇒ Q`.
    pub fn can_be_used_for_implication(&self, id: TermId, is_math_type: bool, implicit: bool) -> bool {
        self.test(Connective::UsableForImplication, id, is_math_type, implicit)
    }

    /// Returns the term in the form that passes `connective`: the term itself if the direct test
    /// holds, its rewriting through an implicit definition if only the implicit test holds, and
    /// `None` otherwise.
    pub fn implicit_form(&mut self, id: TermId, connective: Connective) -> Option<TermId> {
        if self.holds(connective, id) {
            return Some(id);
        }
        if !self.test(connective, id, true, true) {
            return None;
        }
        self.last_implicit_rewrite()
    }

    pub fn is_prop(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Prop
    }

    pub fn is_type(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Type
    }

    /// Tests whether a term is a variable in the usual sense: a local constant that is neither a
    /// type nor a proof of some proposition.
    pub fn is_variable(&self, id: TermId, is_math_type: bool) -> bool {
        let subject = self.subject(id, is_math_type);
        if subject.kind != NodeKind::LocalConstant {
            return false;
        }
        let var_type = subject.math_type;
        !(self.is_no_type(var_type)
            || self.is_type(var_type, true)
            || self.is_prop(var_type, false))
    }

    pub fn is_sequence(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Sequence
    }

    pub fn is_set_family(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::SetFamily
    }

    pub fn is_lambda(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Lambda
    }

    pub fn is_function(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Function
    }

    pub fn is_nat(&self, id: TermId, is_math_type: bool) -> bool {
        self.which_number_set(id, is_math_type) == Some(NumberDomain::Naturals)
    }

    /// Tests for `x ∈ A` where `A` is a local constant.
    pub fn is_atomic_belong(&self, id: TermId, is_math_type: bool) -> bool {
        let subject = self.subject(id, is_math_type);
        subject.kind == NodeKind::Belongs
            && subject
                .children
                .get(1)
                .is_some_and(|&set| self[set].kind == NodeKind::LocalConstant)
    }

    /// Tests for an application of a local constant, whose own placeholder bound variable is then
    /// not used for display.
    pub fn is_app_of_local_constant(&self, id: TermId) -> bool {
        let term = &self[id];
        term.kind == NodeKind::Application
            && term
                .children
                .first()
                .is_some_and(|&f| self[f].kind == NodeKind::LocalConstant)
    }

    /// If the term is an implication, returns its premise.
    pub fn premise(&self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let subject = self.subject(id, is_math_type);
        (subject.kind == NodeKind::Implies).then(|| subject.children[0])
    }

    pub fn is_quantifier(&self, id: TermId, is_math_type: bool) -> bool {
        self.is_exists(id, is_math_type, false) || self.is_for_all(id, is_math_type, false)
    }

    pub fn is_equality(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Equal
    }

    /// Tests for an equality between two subsets.
    pub fn is_set_equality(&self, id: TermId, is_math_type: bool) -> bool {
        if !self.is_equality(id, is_math_type) {
            return false;
        }
        let left = self.subject(id, is_math_type).children[0];
        self[self[left].math_type].kind == NodeKind::Set
    }

    pub fn is_non_equality(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::NotEqual
    }

    /// Tests for `<`, `>`, `≤`, `≥` and `≠`.
    pub fn is_inequality(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind.is_inequality()
    }

    /// Tests whether the term stands for a type class instance, which is never displayed.
    pub fn is_instance(&self, id: TermId) -> bool {
        self[id].name().is_some_and(|n| n.starts_with("_inst_"))
    }

    /// Tests for an equality or inequality between numbers.
    pub fn concerns_numbers(&self, id: TermId) -> bool {
        let is_relation = self.is_equality(id, true)
            || self.is_inequality(id, true)
            || self.is_non_equality(id, true);
        if !is_relation {
            return false;
        }
        let left = self[id].children[0];
        NumberDomain::from_str(self[self[left].math_type].display_name()).is_ok()
    }

    /// The number domain a term names, if any. `RealSubGroup` counts as `ℝ`.
    pub fn number_domain(&self, id: TermId) -> Option<NumberDomain> {
        match self[id].display_name() {
            "RealSubGroup" => Some(NumberDomain::Reals),
            name => NumberDomain::from_str(name).ok(),
        }
    }

    pub fn is_number(&self, id: TermId) -> bool {
        self.number_domain(id).is_some()
    }

    /// Returns the number domain the term (or its type) is, if it is one of the domain constants.
    pub fn which_number_set(&self, id: TermId, is_math_type: bool) -> Option<NumberDomain> {
        let subject = self.subject(id, is_math_type);
        if subject.kind != NodeKind::Constant {
            return None;
        }
        NumberDomain::from_str(subject.display_name()).ok()
    }

    pub fn is_iff(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::Iff
    }

    /// Tests for a negation, including `∉` and `≠`.
    pub fn is_not(&self, id: TermId, is_math_type: bool) -> bool {
        matches!(
            self.subject(id, is_math_type).kind,
            NodeKind::Not | NodeKind::NotBelongs | NodeKind::NotEqual
        )
    }

    pub fn is_false(&self, id: TermId, is_math_type: bool) -> bool {
        self.subject(id, is_math_type).kind == NodeKind::False
    }

    pub fn is_application(&self, id: TermId) -> bool {
        self[id].kind == NodeKind::Application
    }

    pub fn is_constant(&self, id: TermId) -> bool {
        self[id].kind == NodeKind::Constant
    }

    pub fn is_implicit_arg(&self, id: TermId) -> bool {
        let term = &self[id];
        term.kind == NodeKind::Type
            || (term.kind == NodeKind::Constant
                && CONSTANT_IMPLICIT_ARGS.contains(&term.display_name()))
    }

    /// Given `¬P`, returns `P`. For `x ∉ A` and `a ≠ b`, builds `x ∈ A` and `a = b`.
    pub fn body_of_negation(&mut self, id: TermId) -> Option<TermId> {
        let term = &self[id];
        match term.kind {
            NodeKind::Not => term.children.first().copied(),
            kind => {
                let positive = kind.without_negation()?;
                let term = Term::new(positive, term.info.clone(), term.children.clone(), term.math_type);
                Some(self.add(term))
            }
        }
    }

    /// Returns `true` if a negation in front of this term can be pushed inside it.
    pub fn is_simplifiable_body_of_neg(&self, id: TermId, is_math_type: bool) -> bool {
        self.is_not(id, is_math_type)
            || self.is_for_all(id, is_math_type, false)
            || self.is_exists(id, is_math_type, false)
            || self.is_and(id, is_math_type, false)
            || self.is_or(id, is_math_type, false)
            || self.is_implication(id, is_math_type, false)
            || self.is_inequality(id, is_math_type)
    }

    /// Finds the first negation, in pre-order, whose body can be simplified, and returns that
    /// body. The search also goes below negations that cannot be pushed.
    pub fn first_pushable_body_of_neg(&mut self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let subject = self.subject_id(id, is_math_type);
        if self.is_not(subject, true) {
            if let Some(body) = self.body_of_negation(subject) {
                if self.is_simplifiable_body_of_neg(body, true) {
                    return Some(body);
                }
            }
        }
        let children = self[subject].children.clone();
        children
            .into_iter()
            .find_map(|child| self.first_pushable_body_of_neg(child, true))
    }

    /// Tests whether a proposition has the shape `(∀ ...)* a = b` or `(∀ ...)* P ⇔ Q`, and if so
    /// returns the equality or equivalence.
    pub fn can_be_used_for_substitution(&self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let subject = self.subject_id(id, is_math_type);
        if self.is_equality(subject, true) || self.is_iff(subject, true) {
            Some(subject)
        } else if self.is_for_all(subject, true, false) {
            self.can_be_used_for_substitution(self[subject].children[2], true)
        } else {
            None
        }
    }

    /// For `x ∈ A`, returns `A`. For `A ⊂ B`, returns the type `SET(B)`.
    pub fn is_belongs_or_included(&mut self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let subject = self.subject(id, is_math_type);
        match subject.kind {
            NodeKind::Belongs => Some(subject.children[1]),
            NodeKind::Included => {
                let superset = subject.children[1];
                let no_type = self.no_type();
                Some(self.add(Term::new(NodeKind::Set, Info::default(), vec![superset], no_type)))
            }
            _ => None,
        }
    }

    /// For a universal implication `∀ x, P(x) ⇒ Q(x)`, returns `P(x)`.
    pub fn bounded_quantification(&self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let subject = self.subject_id(id, is_math_type);
        if !self.is_for_all(subject, true, false) {
            return None;
        }
        self.premise(self[subject].children[2], true)
    }

    /// For a bounded universal property `∀ x, x ∈ A ⇒ ...`, returns the set `A` the variable
    /// really ranges over.
    pub fn bounded_quantification_real_type(&mut self, id: TermId, is_math_type: bool) -> Option<TermId> {
        let premise = self.bounded_quantification(id, is_math_type)?;
        self.is_belongs_or_included(premise, true)
    }

    /// The main symbol of a proposition, e.g. `"forall"` for a universal property.
    pub fn main_symbol(&self, id: TermId, is_math_type: bool) -> Option<&'static str> {
        let symbol = if self.is_and(id, is_math_type, false) {
            "and"
        } else if self.is_or(id, is_math_type, false) {
            "or"
        } else if self.is_not(id, is_math_type) {
            "not"
        } else if self.is_implication(id, is_math_type, false) {
            "implies"
        } else if self.is_iff(id, is_math_type) {
            "iff"
        } else if self.is_for_all(id, is_math_type, false) {
            "forall"
        } else if self.is_exists(id, is_math_type, false) {
            "exists"
        } else if self.is_equality(id, is_math_type) {
            "equal"
        } else if self.is_function(id, is_math_type) {
            "function"
        } else if self.is_atomic_belong(id, is_math_type) {
            "belong"
        } else {
            return None;
        };
        Some(symbol)
    }
}
