//! The local context of bound variables, and the pass that gives them display names.

use super::{NodeKind, NumberDomain, Session, TermId, NO_NAME, UNNAMED};
use ahash::AHashSet;

/// Returns the hint with one more prime, or the next letter of the alphabet, in that order of
/// preference, until some candidate is not forbidden.
fn candidates(hint: &str) -> impl Iterator<Item = String> + '_ {
    let primes = [String::new(), "'".to_owned(), "''".to_owned()]
        .into_iter()
        .map(move |p| format!("{}{}", hint, p));

    let mut chars = hint.chars();
    let following_letters: Vec<String> = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => ((c as u8 + 1)..=b'z')
            .map(|b| (b as char).to_string())
            .collect(),
        (Some(c), None) if c.is_ascii_uppercase() => ((c as u8 + 1)..=b'Z')
            .map(|b| (b as char).to_string())
            .collect(),
        _ => Vec::new(),
    };

    let indexed = (1..).map(move |i| format!("{}_{}", hint, i));
    primes.chain(following_letters).chain(indexed)
}

impl Session {
    /// Records, for every bound variable of `root`, the bound variables already introduced at its
    /// binding site.
    ///
    /// If the configuration asks for independent local contexts, each child subtree receives its
    /// own copy of the context, so that variables bound in parallel sub-expressions do not see
    /// each other. This must run once on every freshly built tree, before naming.
    ///
    /// # Panics
    ///
    /// Panics if `root` is a stale handle.
    pub fn propagate_local_context(&mut self, root: TermId) {
        let mut context = Vec::new();
        self.propagate_from(root, &mut context);
    }

    fn propagate_from(&mut self, id: TermId, context: &mut Vec<TermId>) {
        if let Some(var) = self.bound_var(id) {
            let snapshot = context.clone();
            if let Some(bound) = self.term_mut(var).bound.as_mut() {
                bound.local_context = snapshot;
            }
            context.push(var);
        }
        if self[id].is_bound() {
            return;
        }
        let independent = self.config.independent_local_contexts;
        let children = self[id].children.clone();
        for child in children {
            if independent {
                let mut own = context.clone();
                self.propagate_from(child, &mut own);
            } else {
                self.propagate_from(child, context);
            }
        }
    }

    /// Gives a display name to every unnamed bound variable in `root`.
    ///
    /// A name is never shared with a named global variable, a variable of the local context, or a
    /// variable introduced by a sibling binder that was named before.
    ///
    /// # Panics
    ///
    /// Panics if `root` is a stale handle.
    pub fn name_bound_vars(&mut self, root: TermId) {
        let globals: AHashSet<String> = self
            .variables()
            .filter(|(_, id)| !self[*id].is_bound())
            .filter_map(|(_, id)| self[id].name().map(str::to_owned))
            .collect();
        let mut siblings = Vec::new();
        self.name_binder(root, &globals, &mut siblings);
        self.name_below(root, &globals);
    }

    fn name_below(&mut self, id: TermId, globals: &AHashSet<String>) {
        if self[id].is_bound() {
            return;
        }
        let children = self[id].children.clone();
        let mut siblings = Vec::new();
        for &child in &children {
            self.name_binder(child, globals, &mut siblings);
        }
        for child in children {
            self.name_below(child, globals);
        }
    }

    fn name_binder(&mut self, id: TermId, globals: &AHashSet<String>, siblings: &mut Vec<String>) {
        let Some(var) = self.bound_var(id) else { return };
        if !self[var].is_unnamed() {
            if let Some(name) = self[var].name() {
                siblings.push(name.to_owned());
            }
            return;
        }
        let mut forbidden: AHashSet<&str> = globals.iter().map(String::as_str).collect();
        forbidden.extend(siblings.iter().map(String::as_str));
        for &other in self[var].local_context() {
            if let Some(name) = self[other].name().filter(|_| !self[other].is_unnamed()) {
                forbidden.insert(name);
            }
        }

        let name = self
            .name_hints(var)
            .into_iter()
            .flat_map(|hint| candidates(&hint).take(30).collect::<Vec<_>>())
            .find(|c| !forbidden.contains(c.as_str()))
            .unwrap_or_else(|| {
                // Indexed candidates never run out
                candidates("x").find(|c| !forbidden.contains(c.as_str())).unwrap_or_default()
            });
        self.rename_bound_var(var, name.clone());
        siblings.push(name);
    }

    /// Sets the display name of a bound variable.
    pub fn rename_bound_var(&mut self, var: TermId, name: String) {
        let term = self.term_mut(var);
        term.info.name = Some(name);
        if let Some(bound) = term.bound.as_mut() {
            bound.is_unnamed = false;
        }
    }

    /// The naming hints for a bound variable, in order of preference.
    fn name_hints(&self, var: TermId) -> Vec<String> {
        let var_type = self[var].math_type;
        let mut hints = Vec::new();
        let preferred = self.preferred_letter(var);
        if !preferred.is_empty() {
            hints.push(preferred);
        }
        if self.config.use_type_name_as_hint {
            if let Some(hint) = self.hint_from_type_name(var_type) {
                hints.push(hint);
            }
        }
        if let Some(hint) = self.hint_from_class(var_type) {
            hints.push(hint.to_owned());
        }
        hints.push("x".to_owned());
        hints
    }

    /// A letter suggested by the variable's source name.
    ///
    /// A source name ending with `__` is always used. Otherwise the source name is only used for
    /// numbers, and number variables without one default to `n` in `ℕ` and `x` in `ℝ`.
    pub fn preferred_letter(&self, var: TermId) -> String {
        let var_type = self[var].math_type;
        let lean_name = match self[var].info.lean_name.as_deref() {
            Some(UNNAMED | NO_NAME) | None => "",
            Some(name) => name,
        };
        let mut letter = if let Some(stripped) = lean_name.strip_suffix("__") {
            stripped
        } else if !lean_name.is_empty() && self.is_number(var_type) {
            lean_name
        } else if self.number_domain(var_type) == Some(NumberDomain::Naturals) {
            "n"
        } else if self.number_domain(var_type) == Some(NumberDomain::Reals) {
            "x"
        } else {
            ""
        };
        for delimiter in ['_', '\''] {
            if let Some(i) = letter.find(delimiter).filter(|&i| i > 0) {
                letter = &letter[..i];
            }
        }
        if !letter.is_empty() && letter.chars().all(char::is_alphabetic) {
            letter.to_owned()
        } else {
            String::new()
        }
    }

    /// An element of a type named with an uppercase letter is named after that letter, e.g. `x`
    /// for `X`. Elements of a sequence type are named after its target type.
    fn hint_from_type_name(&self, var_type: TermId) -> Option<String> {
        let term = &self[var_type];
        if self.is_type(var_type, false) {
            let name = term.display_name();
            let first = name.chars().next()?;
            if name.chars().all(char::is_alphabetic) && first.is_uppercase() {
                return Some(first.to_lowercase().collect());
            }
        }
        if term.kind == NodeKind::Sequence {
            let target = *term.children.get(1)?;
            if !self.is_number(target) {
                return self.hint_from_type_name(target);
            }
        }
        None
    }

    fn hint_from_class(&self, var_type: TermId) -> Option<&'static str> {
        let hint = if self[var_type].kind.is_set_like() {
            "A"
        } else if self.is_type(var_type, true) {
            "X"
        } else if self.is_prop(var_type, true) {
            "P"
        } else if self.is_function(var_type, true) {
            "f"
        } else if self.is_sequence(var_type, true) {
            "u"
        } else if self.is_nat(var_type, true) {
            "n"
        } else {
            return None;
        };
        Some(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::candidates;

    #[test]
    fn test_candidates() {
        let got: Vec<_> = candidates("x").take(6).collect();
        assert_eq!(got, ["x", "x'", "x''", "y", "z", "x_1"]);

        let got: Vec<_> = candidates("eps").take(4).collect();
        assert_eq!(got, ["eps", "eps'", "eps''", "eps_1"]);
    }
}
