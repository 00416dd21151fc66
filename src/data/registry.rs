//! Entity storage with an explicit display order.

use std::collections::HashMap;
use std::hash::Hash;

use super::circuit::CircuitConfig;
use super::key::CircuitId;
use super::thread_pool::ThreadPoolConfig;

/// One class of entities: a map from identity to config plus the order the
/// entities are displayed in. New entities are appended; sorting reorders.
#[derive(Debug, Clone)]
pub struct Section<K, V> {
    entries: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Section<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K, V> Section<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, inserting `make()` if it is absent. The flag is `true`
    /// when a new entry was created.
    pub fn register_if_absent(&mut self, key: K, make: impl FnOnce() -> V) -> (&mut V, bool) {
        let inserted = !self.entries.contains_key(&key);
        if inserted {
            self.order.push(key.clone());
        }
        let entry = self.entries.entry(key).or_insert_with(make);
        (entry, inserted)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|k| self.entries.get(k))
    }

    /// Mutable access to every entry, in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    /// Reorder with a comparator over the configs. The sort is stable.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&V, &V) -> std::cmp::Ordering) {
        let entries = &self.entries;
        self.order.sort_by(|a, b| match (entries.get(a), entries.get(b)) {
            (Some(a), Some(b)) => compare(a, b),
            _ => std::cmp::Ordering::Equal,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Every entity the dashboard knows about.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub circuits: Section<CircuitId, CircuitConfig>,
    pub thread_pools: Section<String, ThreadPoolConfig>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.circuits.clear();
        self.thread_pools.clear();
    }
}
