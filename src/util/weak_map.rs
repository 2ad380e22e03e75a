use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Concurrent map keyed by the identity of an `Arc`, which never keeps its keys alive
///
/// Only a `Weak` is stored for each key. Once every strong reference to a key is dropped the
/// entry is dead: it is no longer returned, and it gets expunged on the next insertion or
/// [`WeakKeyMap::sweep`].
///
/// Identity is the address of the shared allocation. The stored `Weak` keeps that allocation
/// (but not the value in it) from being freed, so an address can't be handed out to a new key
/// while an entry for it exists.
pub struct WeakKeyMap<K, V> {
    entries: RwLock<HashMap<usize, (Weak<K>, V)>>,
}

/// Address used as the identity of a key
pub fn arc_address<K>(key: &Arc<K>) -> usize {
    Arc::as_ptr(key) as *const () as usize
}

impl<K, V> WeakKeyMap<K, V> {
    pub fn new() -> WeakKeyMap<K, V> {
        WeakKeyMap {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Lookup the value associated with a live key
    pub fn get(&self, key: &Arc<K>) -> Option<V>
    where
        V: Clone,
    {
        let entries = self.entries.read();
        entries
            .get(&arc_address(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, value)| value.clone())
    }

    /// Lookup the value associated with a key, computing and inserting it if it is missing
    ///
    /// `make` runs without holding any lock, so two threads racing on the same key may both
    /// compute a value. The first one inserted wins and is returned to both.
    pub fn get_or_insert_with(&self, key: &Arc<K>, make: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = make();
        let mut entries = self.entries.write();
        Self::expunge(&mut entries);
        entries
            .entry(arc_address(key))
            .or_insert_with(|| (Arc::downgrade(key), value))
            .1
            .clone()
    }

    /// Associate a value with a key, returning the previous value
    pub fn insert(&self, key: &Arc<K>, value: V) -> Option<V> {
        let mut entries = self.entries.write();
        Self::expunge(&mut entries);
        entries
            .insert(arc_address(key), (Arc::downgrade(key), value))
            .map(|(_, previous)| previous)
    }

    pub fn remove(&self, key: &Arc<K>) -> Option<V> {
        self.entries
            .write()
            .remove(&arc_address(key))
            .map(|(_, value)| value)
    }

    /// Drop all entries whose key is dead, returning how many were dropped
    pub fn sweep(&self) -> usize {
        Self::expunge(&mut self.entries.write())
    }

    /// Number of entries (including dead entries which have not been swept yet)
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn expunge(entries: &mut HashMap<usize, (Weak<K>, V)>) -> usize {
        let before = entries.len();
        entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        before - entries.len()
    }
}

impl<K, V> Default for WeakKeyMap<K, V> {
    fn default() -> Self {
        WeakKeyMap::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys_are_identities() {
        let map = WeakKeyMap::new();
        let first = Arc::new(String::from("env"));
        let second = Arc::new(String::from("env"));

        assert_eq!(map.get_or_insert_with(&first, || 1), 1);
        assert_eq!(map.get_or_insert_with(&first, || 2), 1);
        assert_eq!(map.get(&second), None);
        assert_eq!(map.insert(&second, 3), None);
        assert_eq!(map.get(&second), Some(3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn does_not_retain_keys() {
        let map = WeakKeyMap::new();
        let key = Arc::new(vec![1, 2, 3]);
        map.insert(&key, "value");

        let weak = Arc::downgrade(&key);
        drop(key);
        assert!(weak.upgrade().is_none());

        assert_eq!(map.len(), 1);
        assert_eq!(map.sweep(), 1);
        assert!(map.is_empty());
    }

    #[test]
    fn insertion_expunges_dead_keys() {
        let map = WeakKeyMap::new();
        let dead = Arc::new(0);
        map.insert(&dead, ());
        drop(dead);

        let live = Arc::new(1);
        map.insert(&live, ());
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&live), Some(()));
    }
}
