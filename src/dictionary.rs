use crate::types::Tree;
use std::collections::{HashMap, HashSet};

// --- Dictionary Definition ---

/// The flat word table. There is no scoping: a later `let` of the same name
/// replaces the earlier binding, and nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    bindings: HashMap<String, Tree>, // Maps word names to bound values
}

impl Dictionary {
    /// Creates a new, empty dictionary.
    pub fn new() -> Self {
        Dictionary {
            bindings: HashMap::new(),
        }
    }

    /// Binds `name`, returning the binding it replaced.
    pub fn define(&mut self, name: String, value: Tree) -> Option<Tree> {
        self.bindings.insert(name, value)
    }

    /// Looks up a word's bound value.
    pub fn get(&self, name: &str) -> Option<&Tree> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Gets a set of all bound word names
    pub fn get_identifiers(&self) -> HashSet<String> {
        self.bindings.keys().cloned().collect()
    }

    /// All bindings, sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &Tree)> {
        let mut entries: Vec<(&str, &Tree)> = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
