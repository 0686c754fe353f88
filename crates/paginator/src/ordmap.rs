//! Insertion-ordered map
//!
//! Keeps keys in the order they were first seen, so filter buttons and
//! session registrations come out in a stable, predictable layout.

use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// Map that iterates in first-insertion order
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: IndexMap<K, V>,
}

impl<K: Hash + Eq, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert a new key at the end, or overwrite an existing value in place
    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.contains_key(key)
    }

    /// Remove a key, shifting later entries down to keep their order
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.shift_remove(key)
    }

    /// Keep only the entries matching the predicate, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&K, &mut V) -> bool) {
        self.entries.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_first_insertion_order() {
        let mut map = OrderedMap::new();
        map.set("b".to_string(), 1);
        map.set("a".to_string(), 2);
        map.set("c".to_string(), 3);
        // Overwrite keeps position
        map.set("b".to_string(), 10);

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(map.get("b"), Some(&10));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_get_missing() {
        let map: OrderedMap<String, bool> = OrderedMap::new();
        assert!(map.get("nope").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_remove_and_retain_keep_order() {
        let mut map = OrderedMap::new();
        for (i, key) in ["w", "x", "y", "z"].iter().enumerate() {
            map.set(key.to_string(), i);
        }

        assert_eq!(map.remove("x"), Some(1));
        map.retain(|_, value| *value != 2);

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["w", "z"]);
    }

    #[test]
    fn test_iter_mut_updates_values() {
        let mut map = OrderedMap::new();
        map.set(1, false);
        map.set(2, false);
        for (_, value) in map.iter_mut() {
            *value = true;
        }
        assert!(map.values().all(|v| *v));
    }
}
