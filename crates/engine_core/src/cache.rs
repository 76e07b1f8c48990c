//! Bounded memoization cache with least-recently-used eviction.
//!
//! Cached values must be pure functions of their key: a concurrent race can
//! at worst recompute a value, never return a wrong one. Callers that bump
//! parameters in sequence (the Greek estimator) must call
//! [`BoundedCache::clear`] first so bumped evaluations are not served stale
//! results.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A fixed-capacity key-value store with LRU eviction.
///
/// Lookup order is refreshed on both hits and inserts. Capacity 0 is
/// normalised to 1 so the cache never panics on insert.
///
/// # Examples
///
/// ```
/// use engine_core::BoundedCache;
///
/// let mut cache: BoundedCache<u64, f64> = BoundedCache::new(2);
/// cache.insert(1, 10.0);
/// cache.insert(2, 20.0);
/// assert_eq!(cache.get(&1), Some(10.0));
///
/// // Key 2 is now least recently used and gets evicted.
/// cache.insert(3, 30.0);
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.len(), 2);
/// ```
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                let value = value.clone();
                self.touch(key);
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair, evicting the least recently used entry if
    /// the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Removes every entry. Hit/miss counters are preserved.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries are cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime hit count, for cache-correctness tests.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lifetime miss count.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Moves `key` to the most-recently-used position.
    ///
    /// Linear scan over the order queue; the cache is sized for small
    /// capacities (128 by default at the lattice wrapper) where this is
    /// cheaper than an intrusive list.
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache: BoundedCache<u32, f64> = BoundedCache::new(4);
        cache.insert(1, 1.5);
        assert_eq!(cache.get(&1), Some(1.5));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        // Touch key 1 so key 2 becomes the eviction candidate.
        assert_eq!(cache.get(&1), Some(10));
        cache.insert(3, 30);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn test_reinsert_updates_value() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        cache.insert(1, 10);
        cache.insert(1, 11);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(11));
    }

    #[test]
    fn test_clear_empties_entries() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(4);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_zero_capacity_normalised() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.len(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// No insert sequence can push the cache past its capacity.
            #[test]
            fn prop_len_bounded_by_capacity(
                capacity in 1usize..16,
                keys in proptest::collection::vec(0u32..64, 0..200),
            ) {
                let mut cache: BoundedCache<u32, f64> = BoundedCache::new(capacity);
                for k in keys {
                    cache.insert(k, f64::from(k));
                }
                prop_assert!(cache.len() <= capacity);
            }

            /// The most recently inserted key is always retrievable, whatever
            /// came before it.
            #[test]
            fn prop_latest_insert_survives(
                capacity in 1usize..16,
                keys in proptest::collection::vec(0u32..64, 0..100),
                probe in 0u32..64,
            ) {
                let mut cache: BoundedCache<u32, f64> = BoundedCache::new(capacity);
                for k in keys {
                    cache.insert(k, f64::from(k));
                }
                cache.insert(probe, 123.5);
                prop_assert_eq!(cache.get(&probe), Some(123.5));
            }

            /// Every lookup lands in exactly one of the hit/miss counters.
            #[test]
            fn prop_hits_plus_misses_equals_lookups(
                keys in proptest::collection::vec(0u32..8, 0..100),
                lookups in proptest::collection::vec(0u32..8, 0..100),
            ) {
                let mut cache: BoundedCache<u32, u32> = BoundedCache::new(4);
                for k in keys {
                    cache.insert(k, k);
                }
                let n = lookups.len() as u64;
                for k in &lookups {
                    let _ = cache.get(k);
                }
                prop_assert_eq!(cache.hits() + cache.misses(), n);
            }
        }
    }
}
