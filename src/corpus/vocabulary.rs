// Bidirectional string <-> id index.

use std::collections::HashMap;

/// Interns strings into dense ids, assigned in insertion order.
///
/// Enumeration order is the id order, so two vocabularies built from the
/// same sequence of `put` calls are identical.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, usize>,
    items: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item and return its id. Existing items keep their id.
    pub fn put(&mut self, item: &str) -> usize {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.items.len();
        self.items.push(item.to_string());
        self.ids.insert(item.to_string(), id);
        id
    }

    pub fn id(&self, item: &str) -> Option<usize> {
        self.ids.get(item).copied()
    }

    pub fn item(&self, id: usize) -> Option<&str> {
        self.items.get(id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate `(id, item)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.items.iter().enumerate().map(|(i, s)| (i, s.as_str()))
    }
}
