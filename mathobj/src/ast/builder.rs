//! Construction of terms from the front-end's decomposed records.

use super::{
    BoundVar, Info, MalformedRecord, NodeKind, NumberDomain, Session, Term, TermId,
    BOUND_VAR_SUFFIX, NO_NAME, UNNAMED,
};
use crate::MathObjResult;
use std::str::FromStr;

/// Bound variables whose source name is kept verbatim instead of being renamed for display.
const UNTOUCHED_BOUND_VAR_NAMES: [&str; 4] = ["RealSubGroup", "_inst_1", "_inst_2", "inst_3"];

fn keeps_lean_name(lean_name: &str) -> bool {
    UNTOUCHED_BOUND_VAR_NAMES.contains(&lean_name) || lean_name.starts_with("_inst_")
}

/// One decomposed record from the front-end: a node kind, its attributes, its type and its
/// already constructed children.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub info: Info,
    pub math_type: Option<TermId>,
    pub children: Vec<TermId>,
}

impl NodeRecord {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            info: Info::default(),
            math_type: None,
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.info.name = Some(name.into());
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.info.identifier = Some(identifier.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.info.value = Some(value.into());
        self
    }

    pub fn math_type(mut self, math_type: TermId) -> Self {
        self.math_type = Some(math_type);
        self
    }

    pub fn children(mut self, children: Vec<TermId>) -> Self {
        self.children = children;
        self
    }
}

/// Builds a bound variable term. The source name, if any, becomes the lean name, and the display
/// name is reset to the unnamed sentinel unless the lean name must be kept.
fn bound_var_term(kind: NodeKind, mut info: Info, children: Vec<TermId>, math_type: TermId) -> Term {
    let source_name = info.name.take().filter(|n| n != UNNAMED && n != NO_NAME);
    if source_name.is_some() {
        info.lean_name = source_name;
    }
    let keep = info.lean_name.as_deref().is_some_and(keeps_lean_name);
    info.name = Some(match &info.lean_name {
        Some(lean_name) if keep => lean_name.clone(),
        _ => UNNAMED.to_owned(),
    });
    Term {
        kind,
        info,
        children,
        math_type,
        bound: Some(BoundVar {
            parent: None,
            local_context: Vec::new(),
            is_unnamed: !keep,
        }),
    }
}

impl Session {
    /// Adds a term to the session.
    ///
    /// Applications whose function is itself an application are flattened, so `App(App(f, x), y)`
    /// is stored as `App(f, x, y)`. If the term is a binder, its bound variable is wired to it.
    pub fn add(&mut self, mut term: Term) -> TermId {
        if term.kind == NodeKind::Application {
            if let Some(&function) = term.children.first() {
                if self[function].kind == NodeKind::Application {
                    let mut flat = self[function].children.clone();
                    flat.extend_from_slice(&term.children[1..]);
                    term.children = flat;
                }
            }
        }
        let id = self.push(term);
        self.wire_binder(id);
        id
    }

    fn wire_binder(&mut self, id: TermId) {
        if !self.has_bound_var(id) {
            return;
        }
        let (var_type, var) = (self[id].children[0], self[id].children[1]);
        let var = self.term_mut(var);
        var.math_type = var_type;
        if let Some(bound) = var.bound.as_mut() {
            bound.parent = Some(id);
        }
    }

    /// Constructs the canonical term for a record.
    ///
    /// Constants are deduplicated by name and identifier-bearing variables by identifier, so
    /// constructing the same variable twice returns the same handle. A variable whose name ends
    /// with `.BoundVar` becomes a bound variable. Sequence and set family variables are then given
    /// their placeholder bound variable, and any such variable used as a plain value among the
    /// children is replaced by its lambda expansion.
    ///
    /// Fails without modifying the session if the record is malformed or refers to stale
    /// handles.
    pub fn construct(&mut self, record: NodeRecord) -> MathObjResult<TermId> {
        for &id in record.children.iter().chain(&record.math_type) {
            self.check(id)?;
        }
        self.validate(&record)?;

        let NodeRecord { kind, info, math_type, children } = record;
        if kind == NodeKind::NotProvided {
            return Ok(self.no_type());
        }
        if kind == NodeKind::Prop && children.is_empty() && info == Info::default() {
            return Ok(self.prop());
        }
        let resolved_type = math_type.unwrap_or_else(|| self.no_type());

        let id = if kind == NodeKind::Constant {
            // `validate` guarantees that constants are named
            let name = info.name.clone().unwrap_or_default();
            match self.constant(&name) {
                Some(cached) => {
                    self.fill_type(cached, math_type);
                    cached
                }
                None => {
                    let id = self.add(Term::new(kind, info, children, resolved_type));
                    self.register_constant(name, id);
                    id
                }
            }
        } else if let Some(identifier) = info.identifier.clone() {
            match self.variable(&identifier) {
                Some(cached) => {
                    self.fill_type(cached, math_type);
                    cached
                }
                None => {
                    let stripped = info
                        .name
                        .as_deref()
                        .and_then(|n| n.strip_suffix(BOUND_VAR_SUFFIX))
                        .map(str::to_owned);
                    let term = match stripped {
                        Some(name) => {
                            let info = Info { name: Some(name), ..info };
                            bound_var_term(kind, info, children, resolved_type)
                        }
                        None => Term::new(kind, info, children, resolved_type),
                    };
                    let id = self.add(term);
                    self.register_variable(identifier, id);
                    id
                }
            }
        } else {
            self.add(Term::new(kind, info, children, resolved_type))
        };

        if self[id].kind == NodeKind::Constant {
            if let Ok(domain) = NumberDomain::from_str(self[id].display_name()) {
                self.insert_number_domain(domain);
            }
        }
        self.synthesize_sequence_shapes(id);
        Ok(id)
    }

    fn validate(&self, record: &NodeRecord) -> Result<(), MalformedRecord> {
        let kind = record.kind;
        if matches!(kind, NodeKind::Constant | NodeKind::LocalConstant) && record.info.name.is_none()
        {
            return Err(MalformedRecord::MissingAttribute { kind, attribute: "name" });
        }
        let got = record.children.len();
        if let Some(expected) = kind.arity() {
            if got != expected {
                return Err(MalformedRecord::WrongArity { kind, expected, got });
            }
        }
        if kind == NodeKind::Application && got < 2 {
            return Err(MalformedRecord::ApplicationArity(got));
        }
        if kind.is_binder() && !self[record.children[1]].is_bound() {
            return Err(MalformedRecord::NotABoundVariable(kind));
        }
        Ok(())
    }

    /// Gives a type to a registry entry constructed without one.
    fn fill_type(&mut self, cached: TermId, math_type: Option<TermId>) {
        let Some(math_type) = math_type else { return };
        let current = self[cached].math_type;
        if self.is_no_type(current) {
            self.term_mut(cached).math_type = math_type;
        } else if current != math_type && !self.equals_unchecked(current, math_type) {
            log::warn!(
                "'{}' was constructed again with a different type",
                self[cached].display_name()
            );
        }
    }

    fn synthesize_sequence_shapes(&mut self, id: TermId) {
        let no_type = self.no_type();

        // A sequence or set family variable gets the shape `[index type, bound var, PROP]`, so
        // that it can be displayed as `(u_n)_{n ∈ ℕ}`.
        let is_candidate = self.is_variable(id, true) || self[id].is_bound();
        if is_candidate && self[id].children.is_empty() && self.is_sequence_like(id) {
            let seq_type = self[id].math_type;
            if let Some(&index_type) = self[seq_type].children.first() {
                let var = self.new_bound_var(index_type, None);
                let prop = self.prop();
                self.term_mut(id).children = vec![index_type, var, prop];
                self.wire_binder(id);
            }
        }

        if matches!(self[id].kind, NodeKind::Application | NodeKind::Lambda) {
            return;
        }
        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            if self[child].is_bound() || !self.is_variable(child, true) {
                continue;
            }
            if !self.is_sequence_like(child) {
                continue;
            }
            let seq_type = self[child].math_type;
            let Some(&index_type) = self[seq_type].children.first() else {
                continue;
            };
            let target_type = self[seq_type].children.get(1).copied().unwrap_or(no_type);
            let var = self.new_bound_var(index_type, None);
            let body = self.add(Term::new(
                NodeKind::Application,
                Info::default(),
                vec![child, var],
                target_type,
            ));
            let lambda = self.lambda(var, body, seq_type);
            self.term_mut(id).children[i] = lambda;
        }
    }

    fn is_sequence_like(&self, id: TermId) -> bool {
        self.is_sequence(id, false) || self.is_set_family(id, false)
    }

    /// Creates a fresh, unnamed bound variable of the given type.
    pub fn new_bound_var(&mut self, math_type: TermId, lean_name: Option<String>) -> TermId {
        let info = Info { lean_name, ..Info::default() };
        self.push(bound_var_term(NodeKind::LocalConstant, info, Vec::new(), math_type))
    }

    /// Applies `function` to `argument`. The result has the codomain of the function's type.
    pub fn application(&mut self, function: TermId, argument: TermId) -> TermId {
        let function_type = self[function].math_type;
        let math_type = match self[function_type].children.get(1) {
            Some(&codomain) => codomain,
            None => self.no_type(),
        };
        self.add(Term::new(
            NodeKind::Application,
            Info::default(),
            vec![function, argument],
            math_type,
        ))
    }

    /// Builds `λ var, body`. Here `math_type` is the type of the whole lambda, e.g. a function or
    /// sequence type.
    pub fn lambda(&mut self, var: TermId, body: TermId, math_type: TermId) -> TermId {
        let var_type = self[var].math_type;
        self.add(Term::new(
            NodeKind::Lambda,
            Info::default(),
            vec![var_type, var, body],
            math_type,
        ))
    }

    /// Copies a term. The copy shares its children with the original.
    pub fn duplicate(&mut self, id: TermId) -> TermId {
        let term = self[id].clone();
        self.push(term)
    }

    /// Follows a path of child indices from `id`, e.g. `[1, 0]` for the first child of the
    /// second child.
    pub fn descendant(&self, id: TermId, path: &[usize]) -> Option<TermId> {
        path.iter()
            .try_fold(id, |current, &i| self[current].children.get(i).copied())
    }

    /// Returns `true` if `id` introduces a bound variable, that is, if it has the
    /// `[bound var type, bound var, body]` shape.
    pub fn has_bound_var(&self, id: TermId) -> bool {
        let term = &self[id];
        term.kind.may_bind() && term.children.len() == 3 && self[term.children[1]].is_bound()
    }

    pub fn bound_var(&self, id: TermId) -> Option<TermId> {
        self.has_bound_var(id).then(|| self[id].children[1])
    }

    pub fn bound_var_type(&self, id: TermId) -> Option<TermId> {
        self.has_bound_var(id).then(|| self[id].children[0])
    }

    pub fn body(&self, id: TermId) -> Option<TermId> {
        self.has_bound_var(id).then(|| self[id].children[2])
    }

    /// Every variable bound in `id`, each once, in pre-order. If `of_type` is given, only
    /// variables whose declared type equals it are returned.
    pub fn bound_vars(&self, id: TermId, of_type: Option<TermId>) -> Vec<TermId> {
        let mut result = Vec::new();
        self.collect_bound_vars(id, of_type, &mut result);
        result
    }

    fn collect_bound_vars(&self, id: TermId, of_type: Option<TermId>, acc: &mut Vec<TermId>) {
        if let (Some(var), Some(var_type)) = (self.bound_var(id), self.bound_var_type(id)) {
            let wanted = of_type.map_or(true, |t| self.equals_unchecked(var_type, t));
            if wanted && !acc.contains(&var) {
                acc.push(var);
            }
        }
        for &child in &self[id].children {
            self.collect_bound_vars(child, of_type, acc);
        }
    }
}
