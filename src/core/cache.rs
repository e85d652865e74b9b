use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Single-slot cache holding an immutable list snapshot.
///
/// Readers get an `Arc` to the snapshot current at the time of the call;
/// a replacement swaps the whole `Arc`, so no reader ever sees a list that
/// is half old and half new.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    slot: RwLock<Option<Arc<Vec<T>>>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, `None` until the first successful load
    pub fn get(&self) -> Option<Arc<Vec<T>>> {
        self.slot.read().ok()?.clone()
    }

    /// Replace the snapshot atomically
    pub fn replace(&self, items: Vec<T>) -> Arc<Vec<T>> {
        let snapshot = Arc::new(items);
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(Arc::clone(&snapshot));
        }
        snapshot
    }

    /// Copy-on-write update of the current snapshot.
    ///
    /// Returns `false` when nothing is cached or `patch` reports no change.
    pub fn update<F>(&self, patch: F) -> bool
    where
        T: Clone,
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let Ok(mut slot) = self.slot.write() else {
            return false;
        };
        let Some(current) = slot.as_ref() else {
            return false;
        };

        let mut next = current.as_ref().clone();
        if !patch(&mut next) {
            return false;
        }
        *slot = Some(Arc::new(next));
        true
    }

    pub fn is_populated(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}

/// Keyed cache of lists, one entry per owner key
#[derive(Debug)]
pub struct KeyedCache<K, V> {
    storage: RwLock<HashMap<K, Arc<Vec<V>>>>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Arc<Vec<V>>> {
        self.storage.read().ok()?.get(key).cloned()
    }

    pub fn insert(&self, key: K, values: Vec<V>) -> Arc<Vec<V>> {
        let values = Arc::new(values);
        if let Ok(mut storage) = self.storage.write() {
            storage.insert(key, Arc::clone(&values));
        }
        values
    }

    pub fn remove(&self, key: &K) -> Option<Arc<Vec<V>>> {
        self.storage.write().ok()?.remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.storage
            .read()
            .map(|storage| storage.contains_key(key))
            .unwrap_or(false)
    }

    /// Copy of the whole mapping
    pub fn snapshot(&self) -> HashMap<K, Arc<Vec<V>>> {
        self.storage
            .read()
            .map(|storage| storage.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage.write() {
            storage.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_cache_replace() {
        let cache = SnapshotCache::new();
        assert!(cache.get().is_none());
        assert!(!cache.is_populated());

        cache.replace(vec![1, 2, 3]);
        assert_eq!(cache.get().as_deref(), Some(&vec![1, 2, 3]));
        assert!(cache.is_populated());
    }

    #[test]
    fn test_snapshot_held_by_reader_is_unchanged_by_replace() {
        let cache = SnapshotCache::new();
        cache.replace(vec!["a".to_string()]);
        let held = cache.get().expect("snapshot");

        cache.replace(vec!["b".to_string(), "c".to_string()]);

        assert_eq!(held.as_ref(), &vec!["a".to_string()]);
        assert_eq!(cache.get().expect("snapshot").len(), 2);
    }

    #[test]
    fn test_snapshot_update() {
        let cache: SnapshotCache<i32> = SnapshotCache::new();
        assert!(!cache.update(|items| {
            items.push(1);
            true
        }));

        cache.replace(vec![1]);
        assert!(cache.update(|items| {
            items.push(2);
            true
        }));
        assert!(!cache.update(|_| false));
        assert_eq!(cache.get().as_deref(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_keyed_cache_operations() {
        let cache = KeyedCache::new();
        cache.insert("c1".to_string(), vec![1]);
        cache.insert("c2".to_string(), vec![]);

        assert!(cache.contains_key(&"c2".to_string()));
        assert_eq!(cache.get(&"c1".to_string()).as_deref(), Some(&vec![1]));
        assert_eq!(cache.snapshot().len(), 2);

        cache.remove(&"c1".to_string());
        assert!(!cache.contains_key(&"c1".to_string()));

        cache.clear();
        assert!(cache.snapshot().is_empty());
    }
}
