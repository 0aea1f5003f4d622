//! The definition database, and the matching engine used to unfold definitions.
//!
//! A definition statement `∀ a b, L(a, b) ⇔ R(a, b)` yields a rule `(left, right)`, where the
//! quantified variables and the free local constants of the statement become meta-variables.
//! A term matching `left` can then be rewritten by substituting the bindings into `right`.

mod pattern;


pub use pattern::{Bindings, MetavarId, Pattern};

use crate::ast::{Connective, Info, NodeKind, Session, StaleSessionAccess, Term, TermId};
use indexmap::IndexMap;
use pattern::{Matcher, PatternBuilder};

/// A definition of the course, as a proposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub statement: TermId,

    /// If `true`, the connective tests may see through this definition.
    pub implicit: bool,
}

/// A rewriting rule extracted from a definition.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The index of the definition in the session's definition list.
    pub definition: usize,
    pub left: Pattern,
    pub right: Pattern,
}

/// The outcome of the last successful implicit match: which rule was used, and the bindings
/// that made its left-hand side match.
#[derive(Debug, Clone)]
pub struct ImplicitMatch {
    pub rule: usize,
    pub bindings: Bindings,
}

#[derive(Debug, Default)]
pub(crate) struct DefinitionSet {
    definitions: Vec<Definition>,
    rules: Vec<Rule>,
}

impl DefinitionSet {
    fn implicit_rules(&self) -> impl Iterator<Item = (usize, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| self.definitions[rule.definition].implicit)
    }
}

impl Session {
    /// Replaces the loaded definitions. A definition whose statement is not an equivalence under
    /// universal quantifiers is kept, but cannot be matched or unfolded.
    pub fn load_definitions(&mut self, definitions: impl IntoIterator<Item = Definition>) {
        let definitions: Vec<_> = definitions.into_iter().collect();
        let mut rules = Vec::new();
        for (index, definition) in definitions.iter().enumerate() {
            match self.rule_from_statement(index, definition.statement) {
                Some(rule) => {
                    log::debug!(
                        "definition '{}' gives {} meta-variables",
                        definition.name,
                        rule.left.metavar_count()
                    );
                    rules.push(rule);
                }
                None => log::debug!("definition '{}' is not an equivalence", definition.name),
            }
        }
        self.definitions = DefinitionSet { definitions, rules };
        self.last_implicit.replace(None);
    }

    fn rule_from_statement(&self, definition: usize, statement: TermId) -> Option<Rule> {
        let (vars, iff) = self.extract_iff(statement)?;
        let mut builder = PatternBuilder::new(self);
        for var in vars {
            builder.declare_metavar(var);
        }
        let left = builder.build(self[iff].children[0]);
        let right = builder.build(self[iff].children[1]);
        Some(Rule { definition, left, right })
    }

    /// Strips the leading universal quantifiers of a statement. Returns the variables they bind
    /// and the remaining body, if it is an equivalence.
    pub fn extract_iff(&self, statement: TermId) -> Option<(Vec<TermId>, TermId)> {
        let mut vars = Vec::new();
        let mut current = statement;
        while self[current].kind == NodeKind::ForAll {
            vars.push(self.bound_var(current)?);
            current = self.body(current)?;
        }
        (self[current].kind == NodeKind::Iff && self[current].children.len() == 2)
            .then_some((vars, current))
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions.definitions
    }

    pub fn implicit_definitions(&self) -> impl Iterator<Item = &Definition> + '_ {
        self.definitions.definitions.iter().filter(|d| d.implicit)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.definitions.rules
    }

    /// Looks for an implicit definition through which `subject` passes a connective test. On
    /// success, the match is recorded as the last implicit match.
    pub(crate) fn implicit_match(&self, connective: Connective, subject: TermId) -> bool {
        for (index, rule) in self.definitions.implicit_rules() {
            let definition = &self.definitions.definitions[rule.definition];
            log::debug!("trying definition '{}'", definition.name);
            let Some(bindings) = self.match_unchecked(&rule.left, subject) else {
                continue;
            };
            if rule.right.satisfies(connective, self, &bindings) {
                log::debug!(
                    "implicit definition '{}' applies to {}",
                    definition.name,
                    self.display(subject)
                );
                self.last_implicit.replace(Some(ImplicitMatch { rule: index, bindings }));
                return true;
            }
        }
        false
    }

    /// The definition used by the last successful implicit test.
    pub fn last_implicit_definition(&self) -> Option<&Definition> {
        let rule = self.last_implicit.borrow().as_ref()?.rule;
        let definition = self.definitions.rules.get(rule)?.definition;
        self.definitions.definitions.get(definition)
    }

    /// Builds the rewriting of the term recognized by the last successful implicit test.
    pub fn last_implicit_rewrite(&mut self) -> Option<TermId> {
        let ImplicitMatch { rule, bindings } = self.last_implicit.borrow().clone()?;
        let right = self.definitions.rules.get(rule)?.right.clone();
        let rewritten = self.apply_pattern(&right, &bindings);
        log::debug!("implicit rewrite: {}", self.display(rewritten));
        Some(rewritten)
    }

    /// Matches a term against a pattern. Returns the meta-variable bindings if it matches.
    ///
    /// `NO_TYPE` itself matches no pattern. Inside a term, an untyped sub-term still matches
    /// whatever the pattern has at that position.
    pub fn match_pattern(
        &self,
        pattern: &Pattern,
        id: TermId,
    ) -> Result<Option<Bindings>, StaleSessionAccess> {
        self.check(id)?;
        Ok(self.match_unchecked(pattern, id))
    }

    fn match_unchecked(&self, pattern: &Pattern, id: TermId) -> Option<Bindings> {
        if self.is_no_type(id) {
            return None;
        }
        let mut matcher = Matcher::new(self);
        matcher.matches(pattern, id).then(|| matcher.into_bindings())
    }

    /// Builds the term a pattern denotes under `bindings`. Each variable bound in the pattern is
    /// replaced by a fresh bound variable, and an unbound meta-variable becomes `NO_TYPE`.
    pub fn apply_pattern(&mut self, pattern: &Pattern, bindings: &Bindings) -> TermId {
        let mut renamed = IndexMap::new();
        self.apply_with(pattern, bindings, &mut renamed)
    }

    fn apply_with(
        &mut self,
        pattern: &Pattern,
        bindings: &Bindings,
        renamed: &mut IndexMap<TermId, TermId>,
    ) -> TermId {
        match pattern {
            Pattern::NoType => self.no_type(),
            Pattern::Metavar { id, .. } => match bindings.get(id) {
                Some(&term) => term,
                None => self.no_type(),
            },
            Pattern::BoundVar { source, math_type } => {
                if let Some(&fresh) = renamed.get(source) {
                    return fresh;
                }
                let math_type = self.apply_with(math_type, bindings, renamed);
                let fresh = self.copy_bound_var(*source, math_type);
                renamed.insert(*source, fresh);
                fresh
            }
            Pattern::Node { kind, info, math_type, children } => {
                if *kind == NodeKind::Prop && children.is_empty() && *info == Info::default() {
                    return self.prop();
                }
                if *kind == NodeKind::Constant {
                    if let Some(constant) = info.name.as_deref().and_then(|n| self.constant(n)) {
                        return constant;
                    }
                }
                let math_type = self.apply_with(math_type, bindings, renamed);
                let children = children
                    .iter()
                    .map(|child| self.apply_with(child, bindings, renamed))
                    .collect();
                self.add(Term::new(*kind, info.clone(), children, math_type))
            }
        }
    }

    /// Copies a bound variable with a new type. The copy is not attached to any binder yet.
    fn copy_bound_var(&mut self, var: TermId, math_type: TermId) -> TermId {
        let mut term = self[var].clone();
        term.math_type = math_type;
        if let Some(bound) = term.bound.as_mut() {
            bound.parent = None;
            bound.local_context.clear();
        }
        self.push(term)
    }

    /// Rewrites a term with every implicit definition whose left-hand side matches it, in
    /// definition order. Returns an empty list if none applies.
    pub fn unfold_one_level(&mut self, id: TermId) -> Result<Vec<TermId>, StaleSessionAccess> {
        self.check(id)?;
        Ok(self.unfold_one_level_unchecked(id))
    }

    fn unfold_one_level_unchecked(&mut self, id: TermId) -> Vec<TermId> {
        if self.is_no_type(id) || self[id].children.is_empty() {
            return Vec::new();
        }
        let matches: Vec<_> = self
            .definitions
            .implicit_rules()
            .filter_map(|(index, rule)| Some((index, self.match_unchecked(&rule.left, id)?)))
            .collect();

        let mut result = Vec::with_capacity(matches.len());
        for (index, bindings) in matches {
            let right = self.definitions.rules[index].right.clone();
            result.push(self.apply_pattern(&right, &bindings));
        }
        result
    }

    /// Unfolds implicit definitions everywhere in a term, top-down, keeping only the first
    /// rewrite at each node.
    ///
    /// The result is a new tree: interior nodes are always rebuilt and bound variables are
    /// replaced by fresh copies, while global variables, constants and leaves are shared with the
    /// input. When the input itself is such a term, or is `NO_TYPE`, the same handle is returned.
    pub fn unfold_recursively(&mut self, id: TermId) -> Result<TermId, StaleSessionAccess> {
        self.check(id)?;
        let mut renamed = IndexMap::new();
        Ok(self.unfold_from(id, &mut renamed))
    }

    fn unfold_from(&mut self, id: TermId, renamed: &mut IndexMap<TermId, TermId>) -> TermId {
        if self.is_no_type(id) {
            return id;
        }
        let root = self
            .unfold_one_level_unchecked(id)
            .first()
            .copied()
            .unwrap_or(id);
        let term = &self[root];
        if term.is_bound() {
            return renamed.get(&root).copied().unwrap_or(root);
        }
        if term.info.identifier.is_some() || term.kind == NodeKind::Constant || term.children.is_empty()
        {
            return root;
        }

        // The copy gets its type from the rebuilt binder
        if let Some(var) = self.bound_var(root) {
            let fresh = self.copy_bound_var(var, self[var].math_type);
            renamed.insert(var, fresh);
        }
        let Term { kind, info, children, math_type, .. } = self[root].clone();
        let children = children
            .into_iter()
            .map(|child| self.unfold_from(child, renamed))
            .collect();
        self.add(Term::new(kind, info, children, math_type))
    }

    /// Every loaded definition whose left-hand side matches the term, implicit or not.
    pub fn matching_definitions(
        &self,
        id: TermId,
        is_math_type: bool,
    ) -> Result<Vec<&Definition>, StaleSessionAccess> {
        self.check(id)?;
        let subject = if is_math_type { id } else { self[id].math_type };
        if self.is_no_type(subject) {
            return Ok(Vec::new());
        }
        Ok(self
            .definitions
            .rules
            .iter()
            .filter(|rule| self.match_unchecked(&rule.left, subject).is_some())
            .map(|rule| &self.definitions.definitions[rule.definition])
            .collect())
    }
}
