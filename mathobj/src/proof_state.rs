//! The proof state handed over by the front-end: a context of objects and properties, and one
//! target per open goal.

use crate::{
    ast::{Session, StaleSessionAccess, TermId},
    parser::{Entry, Parser, ParserError, Position},
    Error, MathObjResult,
};
use std::{fmt, io::BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A mathematical object, e.g. `f : X → Y`.
    Object,

    /// A hypothesis, e.g. `H : x ∈ A`.
    Property,
}

/// An entry of the context. The head is the term standing for the entry, usually a local
/// constant, and its type is what the entry denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextEntry {
    pub kind: EntryKind,
    pub head: TermId,
}

impl ContextEntry {
    pub fn math_type(&self, session: &Session) -> TermId {
        session[self.head].math_type
    }

    pub fn name<'s>(&self, session: &'s Session) -> Option<&'s str> {
        session[self.head].name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofState {
    pub context: Vec<ContextEntry>,

    /// The goals, each given by the proposition to prove.
    pub targets: Vec<TermId>,
}

impl ProofState {
    /// Builds a proof state from the hypotheses stream and the targets stream.
    ///
    /// The hypotheses stream may only contain `object` and `property` entries, and the targets
    /// stream only `target` entries. Once every term is constructed, the local context of every
    /// bound variable is computed.
    pub fn from_streams<H: BufRead, T: BufRead>(
        session: &mut Session,
        hypotheses: H,
        targets: T,
    ) -> MathObjResult<Self> {
        let mut context = Vec::new();
        {
            let mut parser = Parser::new(session, hypotheses)?;
            while let Some((entry, position)) = parser.next_entry()? {
                let (kind, head) = match entry {
                    Entry::Object(head) => (EntryKind::Object, head),
                    Entry::Property(head) => (EntryKind::Property, head),
                    other => return Err(unexpected_entry(&other, position)),
                };
                context.push(ContextEntry { kind, head });
            }
        }

        let mut goals = Vec::new();
        {
            let mut parser = Parser::new(session, targets)?;
            while let Some((entry, position)) = parser.next_entry()? {
                match entry {
                    Entry::Target(target) => goals.push(target),
                    other => return Err(unexpected_entry(&other, position)),
                }
            }
        }

        let state = ProofState { context, targets: goals };
        for root in state.roots(session) {
            session.propagate_local_context(root);
        }
        log::info!(
            "built proof state with {} context entries and {} targets",
            state.context.len(),
            state.targets.len()
        );
        Ok(state)
    }

    /// The terms the proof state is made of: the head and type of every context entry, and the
    /// targets.
    fn roots(&self, session: &Session) -> Vec<TermId> {
        self.context
            .iter()
            .flat_map(|entry| [entry.head, entry.math_type(session)])
            .chain(self.targets.iter().copied())
            .collect()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ContextEntry> + '_ {
        self.context.iter().filter(|e| e.kind == EntryKind::Object)
    }

    pub fn properties(&self) -> impl Iterator<Item = &ContextEntry> + '_ {
        self.context.iter().filter(|e| e.kind == EntryKind::Property)
    }

    /// Gives a display name to every unnamed bound variable of the proof state.
    pub fn name_bound_vars(&self, session: &mut Session) {
        for root in self.roots(session) {
            session.name_bound_vars(root);
        }
    }

    /// The names of the context entries, followed by the names of the variables bound in their
    /// types and in the targets.
    pub fn variable_names(&self, session: &Session) -> Vec<String> {
        let mut names = Vec::new();
        for entry in &self.context {
            if let Some(name) = entry.name(session).filter(|n| !n.is_empty()) {
                names.push(name.to_owned());
            }
            names.extend(bound_var_names(session, entry.math_type(session)));
        }
        for &target in &self.targets {
            names.extend(bound_var_names(session, target));
        }
        names
    }

    /// Tags the entries of this proof state and of a previous one.
    ///
    /// Context entries are paired by name. A pair with equal types is tagged `=`, and a pair with
    /// different types `≠`. Entries left without a partner are tagged `+`. Targets are paired by
    /// position. If `goal_is_new` is set, the previous goal was solved, and everything is tagged
    /// `+`.
    pub fn compare(
        &self,
        old: &ProofState,
        session: &Session,
        goal_is_new: bool,
    ) -> Result<GoalDiff, StaleSessionAccess> {
        for state in [self, old] {
            let heads = state.context.iter().map(|e| e.head);
            for id in heads.chain(state.targets.iter().copied()) {
                session.check(id)?;
            }
        }
        if goal_is_new {
            return Ok(GoalDiff {
                new_context: vec![DiffTag::Added; self.context.len()],
                old_context: vec![DiffTag::Added; old.context.len()],
                new_targets: vec![DiffTag::Added; self.targets.len()],
                old_targets: vec![DiffTag::Added; old.targets.len()],
            });
        }

        let mut new_context = Vec::with_capacity(self.context.len());
        let mut old_context: Vec<Option<DiffTag>> = vec![None; old.context.len()];
        for entry in &self.context {
            let partner = entry.name(session).and_then(|name| {
                (0..old.context.len())
                    .find(|&i| old_context[i].is_none() && old.context[i].name(session) == Some(name))
            });
            let tag = match partner {
                None => DiffTag::Added,
                Some(i) => {
                    let old_type = old.context[i].math_type(session);
                    let tag = if session.equals(old_type, entry.math_type(session))? {
                        DiffTag::Unchanged
                    } else {
                        DiffTag::Modified
                    };
                    old_context[i] = Some(tag);
                    tag
                }
            };
            new_context.push(tag);
        }
        let old_context: Vec<DiffTag> = old_context
            .into_iter()
            .map(|tag| tag.unwrap_or(DiffTag::Added))
            .collect();

        let mut new_targets = vec![DiffTag::Added; self.targets.len()];
        let mut old_targets = vec![DiffTag::Added; old.targets.len()];
        for (i, (&new, &previous)) in self.targets.iter().zip(&old.targets).enumerate() {
            let tag = if session.equals(previous, new)? {
                DiffTag::Unchanged
            } else {
                DiffTag::Modified
            };
            new_targets[i] = tag;
            old_targets[i] = tag;
        }
        log::debug!("compared proof states: {:?} against {:?}", new_context, old_context);
        Ok(GoalDiff { new_context, old_context, new_targets, old_targets })
    }
}

fn unexpected_entry(entry: &Entry, position: Position) -> Error {
    Error::Parser(ParserError::UnexpectedEntry(entry.header().to_owned()), position)
}

fn bound_var_names(session: &Session, root: TermId) -> Vec<String> {
    session
        .bound_vars(root, None)
        .into_iter()
        .filter(|&var| !session[var].is_unnamed())
        .filter_map(|var| session[var].name().map(str::to_owned))
        .collect()
}

/// How an entry of a proof state relates to the other proof state it is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    /// Present on one side only.
    Added,
    Unchanged,
    /// Present on both sides with different types.
    Modified,
}

impl fmt::Display for DiffTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            DiffTag::Added => "+",
            DiffTag::Unchanged => "=",
            DiffTag::Modified => "≠",
        };
        write!(f, "{}", s)
    }
}

/// The tags computed by [`ProofState::compare`], in the order of the entries they tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDiff {
    pub new_context: Vec<DiffTag>,
    pub old_context: Vec<DiffTag>,
    pub new_targets: Vec<DiffTag>,
    pub old_targets: Vec<DiffTag>,
}
