//! Capacity-bounded in-memory cache with oldest-first eviction.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;

/// Default number of entries kept before eviction starts.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Thread-safe cache holding at most `capacity` entries.
///
/// Eviction follows insertion order: once an insert would exceed the
/// capacity, the oldest inserted entry is dropped. Reads do not refresh an
/// entry's position.
pub struct BoundedCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    capacity: usize,
}

struct CacheState<K, V> {
    entries: HashMap<K, V>,
    /// Keys in insertion order, oldest at the front.
    order: VecDeque<K>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries. A capacity of zero
    /// is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                order: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            }),
            capacity,
        }
    }

    /// Returns a clone of the cached value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.get(key).cloned()
    }

    /// Inserts `value` under `key`, evicting the oldest entries if the cache
    /// would grow past its capacity.
    ///
    /// Re-inserting an existing key replaces the value in place and keeps its
    /// original position in the eviction order.
    pub fn insert(&self, key: K, value: V) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = value;
            return;
        }
        state.order.push_back(key.clone());
        state.entries.insert(key, value);
        while state.entries.len() > self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.clear();
        state.order.clear();
    }
}

impl<K, V> Default for BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_insert_and_get() {
        let cache = BoundedCache::new(10);
        cache.insert("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
    }

    #[test]
    fn cache_miss() {
        let cache: BoundedCache<String, String> = BoundedCache::new(10);
        assert_eq!(cache.get(&"nonexistent".to_string()), None);
    }

    #[test]
    fn cache_stores_none_values() {
        let cache: BoundedCache<&str, Option<u32>> = BoundedCache::new(10);
        cache.insert("failed", None);
        assert_eq!(cache.get(&"failed"), Some(None));
    }

    #[test]
    fn cache_evicts_oldest_first() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn cache_read_does_not_refresh_order() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn cache_overwrite_keeps_size_and_position() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(10));
        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn cache_never_exceeds_capacity() {
        let cache = BoundedCache::new(5);
        for i in 0..100 {
            cache.insert(i, i * 2);
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.get(&99), Some(198));
        assert_eq!(cache.get(&94), None);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let cache = BoundedCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
    }

    #[test]
    fn cache_clear() {
        let cache = BoundedCache::new(10);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
    }
}
