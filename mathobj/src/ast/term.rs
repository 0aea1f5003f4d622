use super::NodeKind;
use std::fmt;

/// The name given to bound variables that have not been named yet.
pub const UNNAMED: &str = "NO NAME";

/// The name displayed for terms that have no name at all.
pub const NO_NAME: &str = "*no_name*";

/// Marks, in the `name` attribute of an identifier-bearing record, a variable that is bound by
/// some binder rather than global to the proof state.
pub const BOUND_VAR_SUFFIX: &str = ".BoundVar";

/// A handle to a term stored in a [`Session`](super::Session).
///
/// Handles are cheap to copy and compare. Two handles are equal if and only if they refer to the
/// same term instance. Each handle also records the session generation in which it was issued, so
/// that using it after the session is cleared can be detected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId {
    pub(super) index: u32,
    pub(super) generation: u32,
}

impl TermId {
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for TermId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

/// The attributes of a node, as given by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    /// The display name of the node.
    pub name: Option<String>,

    /// A stable identifier, shared by every occurrence of the same variable.
    pub identifier: Option<String>,

    /// A literal value, for numbers.
    pub value: Option<String>,

    /// The name the variable has in the prover's source, if any.
    pub lean_name: Option<String>,

    /// The prover's own rendering of the node's type. Only kept for display.
    pub pp_type: Option<String>,
}

impl Info {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }
}

/// The data only bound variables carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundVar {
    /// The binder that introduces this variable. This is only a lookup relation, the binder does
    /// not own the variable.
    pub parent: Option<TermId>,

    /// The bound variables already introduced where this variable is introduced.
    pub local_context: Vec<TermId>,

    /// `false` once a display name has been assigned.
    pub is_unnamed: bool,
}

/// A node of a term tree.
///
/// Terms are stored in a session arena and refer to each other through [`TermId`] handles, so
/// that identical global variables and constants are shared between trees.
#[derive(Debug, Clone)]
pub struct Term {
    pub kind: NodeKind,
    pub info: Info,
    pub children: Vec<TermId>,

    /// The type of this term. Terms without a type point to the session's `NO_TYPE` sentinel.
    pub math_type: TermId,

    /// Present if and only if this term is a bound variable.
    pub bound: Option<BoundVar>,
}

impl Term {
    pub fn new(kind: NodeKind, info: Info, children: Vec<TermId>, math_type: TermId) -> Self {
        Self { kind, info, children, math_type, bound: None }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.info.value.as_deref()
    }

    /// The name used to display this term.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(NO_NAME)
    }

    /// Returns `true` if this is a bound variable that has not been named yet.
    pub fn is_unnamed(&self) -> bool {
        self.bound.as_ref().is_some_and(|b| b.is_unnamed)
    }

    pub fn local_context(&self) -> &[TermId] {
        self.bound.as_ref().map_or(&[], |b| b.local_context.as_slice())
    }

    pub fn parent(&self) -> Option<TermId> {
        self.bound.as_ref().and_then(|b| b.parent)
    }
}
