//! Bidirectional name interning for material and group names.

use std::collections::HashMap;

/// Maps names to small, insertion-ordered indices and back.
#[derive(Debug, Clone, Default)]
pub struct NameInterner {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl NameInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interner whose first entry (index 0) is `name`.
    pub fn with_first(name: &str) -> Self {
        let mut interner = Self::new();
        interner.intern(name);
        interner
    }

    /// Get the index for `name`, adding it if unseen.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
