use indexmap::IndexMap;
use std::{borrow::Borrow, hash::Hash};

/// Returns `true` if the character can appear in a symbol of the record stream. Anything except
/// whitespace, parentheses, double quotes and the comment character is allowed, so that node
/// kinds like `QUANT_∀` or `PROP_≤` are plain symbols.
pub fn is_symbol_character(ch: char) -> bool {
    !(ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';'))
}

/// A stack of hash maps, where lookups go from the innermost scope outwards.
#[derive(Debug)]
pub struct HashMapStack<K, V> {
    scopes: Vec<IndexMap<K, V>>,
}

impl<K, V> HashMapStack<K, V> {
    pub fn new() -> Self {
        Self { scopes: vec![IndexMap::new()] }
    }

    pub fn height(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.iter().all(IndexMap::is_empty)
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn pop_scope(&mut self) {
        match self.scopes.len() {
            0 => unreachable!(),
            1 => panic!("trying to pop last scope in `HashMapStack`"),
            _ => {
                self.scopes.pop();
            }
        }
    }
}

impl<K: Eq + Hash, V> HashMapStack<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    pub fn insert(&mut self, key: K, value: V) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(key, value);
        }
    }
}

impl<K, V> Default for HashMapStack<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_stack_scopes() {
        let mut stack = HashMapStack::new();
        stack.insert("x", 1);
        stack.push_scope();
        stack.insert("x", 2);
        stack.insert("y", 3);
        assert_eq!(stack.get("x"), Some(&2));
        assert_eq!(stack.height(), 2);

        stack.pop_scope();
        assert_eq!(stack.get("x"), Some(&1));
        assert_eq!(stack.get("y"), None);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_symbol_characters() {
        assert!("QUANT_∃!".chars().all(is_symbol_character));
        assert!("PROP_≤".chars().all(is_symbol_character));
        assert!(!is_symbol_character('('));
        assert!(!is_symbol_character(';'));
        assert!(!is_symbol_character(' '));
    }
}
