//! Patterns: terms whose parameters are replaced by meta-variables.

use crate::ast::{BoundVarTags, Connective, Info, NodeKind, Session, TermId};
use indexmap::IndexMap;

pub type MetavarId = u32;

/// The terms bound to the meta-variables of a pattern by a successful match.
pub type Bindings = IndexMap<MetavarId, TermId>;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Matches anything. This is the pattern of an untyped term.
    NoType,

    /// A placeholder for a parameter of a definition. The first occurrence binds it, and every
    /// other occurrence must be equal to the bound term. The first occurrence also requires the
    /// term's type to match `math_type`, so a parameter never binds a term of the wrong type.
    Metavar { id: MetavarId, math_type: Box<Pattern> },

    /// A variable bound inside the pattern. It only matches the bound variable introduced at the
    /// same position in the term.
    BoundVar { source: TermId, math_type: Box<Pattern> },

    Node {
        kind: NodeKind,
        info: Info,
        math_type: Box<Pattern>,
        children: Vec<Pattern>,
    },
}

impl Pattern {
    /// Builds a pattern from a term, turning every local constant that is not a bound variable
    /// into a meta-variable.
    pub fn from_term(session: &Session, id: TermId) -> Self {
        PatternBuilder::new(session).build(id)
    }

    pub fn is_metavar(&self) -> bool {
        matches!(self, Pattern::Metavar { .. })
    }

    /// The number of distinct meta-variables in this pattern.
    pub fn metavar_count(&self) -> usize {
        let mut seen = Vec::new();
        self.collect_metavars(&mut seen);
        seen.len()
    }

    fn collect_metavars(&self, acc: &mut Vec<MetavarId>) {
        match self {
            Pattern::NoType => (),
            Pattern::Metavar { id, math_type } => {
                if !acc.contains(id) {
                    acc.push(*id);
                }
                math_type.collect_metavars(acc);
            }
            Pattern::BoundVar { math_type, .. } => math_type.collect_metavars(acc),
            Pattern::Node { math_type, children, .. } => {
                math_type.collect_metavars(acc);
                for child in children {
                    child.collect_metavars(acc);
                }
            }
        }
    }

    /// Evaluates a connective test on the term this pattern denotes under `bindings`. A bound
    /// meta-variable is tested through its bound term.
    pub(crate) fn satisfies(&self, connective: Connective, session: &Session, bindings: &Bindings) -> bool {
        match self {
            Pattern::Metavar { id, .. } => bindings
                .get(id)
                .is_some_and(|&term| session.holds(connective, term)),
            Pattern::Node { kind, children, .. } => {
                if connective.matches_kind(*kind) {
                    return true;
                }
                connective.looks_through_for_all()
                    && *kind == NodeKind::ForAll
                    && children
                        .get(2)
                        .is_some_and(|body| body.satisfies(connective, session, bindings))
            }
            Pattern::NoType | Pattern::BoundVar { .. } => false,
        }
    }
}

/// Builds patterns, keeping one meta-variable per distinct local constant.
pub(crate) struct PatternBuilder<'s> {
    session: &'s Session,
    metavars: IndexMap<TermId, Pattern>,
}

impl<'s> PatternBuilder<'s> {
    pub(crate) fn new(session: &'s Session) -> Self {
        Self { session, metavars: IndexMap::new() }
    }

    /// Makes `var` a meta-variable, even if it is a bound variable. This is used for the
    /// variables of the universal quantifiers stripped from a definition statement.
    pub(crate) fn declare_metavar(&mut self, var: TermId) {
        if self.metavars.contains_key(&var) {
            return;
        }
        let math_type = Box::new(self.build(self.session[var].math_type));
        let id = self.metavars.len() as MetavarId;
        self.metavars.insert(var, Pattern::Metavar { id, math_type });
    }

    pub(crate) fn build(&mut self, id: TermId) -> Pattern {
        let session = self.session;
        if session.is_no_type(id) {
            return Pattern::NoType;
        }
        if let Some(metavar) = self.metavars.get(&id) {
            return metavar.clone();
        }
        let term = &session[id];
        if term.kind == NodeKind::LocalConstant && !term.is_bound() {
            self.declare_metavar(id);
            return self.metavars.get(&id).cloned().unwrap_or(Pattern::NoType);
        }

        let math_type = Box::new(self.build(term.math_type));
        if term.is_bound() {
            return Pattern::BoundVar { source: id, math_type };
        }
        let children = term.children.iter().map(|&child| self.build(child)).collect();
        Pattern::Node {
            kind: term.kind,
            info: term.info.clone(),
            math_type,
            children,
        }
    }
}

/// Matches terms against a pattern, collecting the meta-variable bindings.
pub(crate) struct Matcher<'s> {
    session: &'s Session,
    tags: BoundVarTags,
    bindings: Bindings,
}

impl<'s> Matcher<'s> {
    pub(crate) fn new(session: &'s Session) -> Self {
        Self {
            session,
            tags: BoundVarTags::default(),
            bindings: Bindings::new(),
        }
    }

    pub(crate) fn into_bindings(self) -> Bindings {
        self.bindings
    }

    pub(crate) fn matches(&mut self, pattern: &Pattern, id: TermId) -> bool {
        let session = self.session;
        let (kind, info, math_type, children) = match pattern {
            Pattern::NoType => return true,
            Pattern::Metavar { id: metavar, math_type } => {
                if let Some(&bound) = self.bindings.get(metavar) {
                    return session.equals_unchecked(bound, id);
                }
                if !self.matches(math_type, session[id].math_type) {
                    return false;
                }
                self.bindings.insert(*metavar, id);
                return true;
            }
            _ if session.is_no_type(id) => return true,
            Pattern::BoundVar { source, .. } => {
                if !session[id].is_bound() {
                    return false;
                }
                return match (self.tags.left(*source), self.tags.right(id)) {
                    (Some(a), Some(b)) => a == b,
                    // Both unmarked: the variables are not local to the compared expressions, so
                    // names have a meaning
                    (None, None) => session[*source].name() == session[id].name(),
                    _ => false,
                };
            }
            Pattern::Node { kind, info, math_type, children } => (kind, info, math_type, children),
        };

        let term = &session[id];
        if *kind != term.kind || term.is_bound() {
            return false;
        }

        let marked = match (children.get(1), session.bound_var(id)) {
            (Some(Pattern::BoundVar { source, .. }), Some(var))
                if kind.may_bind() && children.len() == 3 =>
            {
                let tag = session.mint_tag();
                self.tags.push(*source, var, tag);
                true
            }
            _ => false,
        };

        // Named nodes, like constants, are identified by their name alone
        let result = if let Some(name) = &info.name {
            term.name() == Some(name.as_str())
        } else {
            self.matches(math_type, term.math_type)
                && children.len() == term.children.len()
                && children
                    .iter()
                    .zip(&term.children)
                    .all(|(p, &child)| self.matches(p, child))
        };

        if marked {
            self.tags.pop();
        }
        result
    }
}
