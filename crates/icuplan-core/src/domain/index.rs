//! Bidirectional id <-> dense index tables.

use std::collections::HashMap;
use std::hash::Hash;

/// Arena of external ids addressed by dense index.
///
/// Indices follow insertion order and never change, so a solved variable
/// indexed by position can always be traced back to the catalog id.
#[derive(Debug, Clone, PartialEq)]
pub struct IdTable<K: Eq + Hash> {
    ids: Vec<K>,
    lookup: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> IdTable<K> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Appends `id` and returns its index, or gives the id back if it is
    /// already present.
    pub fn insert(&mut self, id: K) -> Result<usize, K> {
        if self.lookup.contains_key(&id) {
            return Err(id);
        }
        let index = self.ids.len();
        self.lookup.insert(id.clone(), index);
        self.ids.push(id);
        Ok(index)
    }

    pub fn index_of(&self, id: &K) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub fn id(&self, index: usize) -> &K {
        &self.ids[index]
    }

    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K: Clone + Eq + Hash> Default for IdTable<K> {
    fn default() -> Self {
        Self::new()
    }
}
