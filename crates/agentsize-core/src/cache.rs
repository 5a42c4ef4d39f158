//! # Assessment Memo Cache
//!
//! Classification is a pure function of `(scores, config)`, so a report can be
//! memoized under the score set plus the [`ConfigHolder`](crate::ConfigHolder)
//! revision that produced the config snapshot. A new revision simply misses;
//! stale entries age out through LRU eviction.
//!
//! Recency uses a logical clock (a counter bumped on every access), never wall
//! time, so eviction order is deterministic. Storage is a `BTreeMap`.

use crate::dimension::ScoreSet;
use crate::engine::AssessmentReport;
use std::collections::BTreeMap;

/// Default number of memoized reports.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

// =============================================================================
// LRU CACHE
// =============================================================================

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    last_access: u64,
}

/// Bounded least-recently-used map with deterministic eviction.
#[derive(Debug, Clone)]
pub struct LruCache<K: Ord + Clone, V> {
    slots: BTreeMap<K, Slot<V>>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<K: Ord + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            capacity: capacity.max(1),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    /// Look up a value, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.tick();
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.last_access = now;
                self.hits = self.hits.saturating_add(1);
                Some(&slot.value)
            }
            None => {
                self.misses = self.misses.saturating_add(1);
                None
            }
        }
    }

    /// Look up a value without touching recency or statistics.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Insert or overwrite a value, evicting the least recently used entry
    /// when a new key would exceed capacity.
    pub fn insert(&mut self, key: K, value: V) {
        let now = self.tick();
        if !self.slots.contains_key(&key) && self.slots.len() >= self.capacity {
            self.evict_one();
        }
        self.slots.insert(
            key,
            Slot {
                value,
                last_access: now,
            },
        );
    }

    /// Return the cached value, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let now = self.tick();
        if self.slots.contains_key(&key) {
            self.hits = self.hits.saturating_add(1);
        } else {
            self.misses = self.misses.saturating_add(1);
            if self.slots.len() >= self.capacity {
                self.evict_one();
            }
        }

        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            value: compute(),
            last_access: now,
        });
        slot.last_access = now;
        &slot.value
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Hit/miss statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits.saturating_add(self.misses);
        let hit_rate_percent = if lookups == 0 {
            0
        } else {
            (self.hits.saturating_mul(100) / lookups) as u8
        };
        CacheStats {
            size: self.slots.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate_percent,
        }
    }

    fn evict_one(&mut self) {
        // Ties cannot happen: every access gets a distinct clock value.
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.slots.remove(&key);
        }
    }
}

/// Cache statistics, integer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as integer percentage (0-100).
    pub hit_rate_percent: u8,
}

// =============================================================================
// ASSESSMENT CACHE
// =============================================================================

/// Memo key: config revision plus the exact score set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssessmentKey {
    pub revision: u64,
    pub scores: ScoreSet,
}

/// Memoized assessment reports.
pub type AssessmentCache = LruCache<AssessmentKey, AssessmentReport>;

/// Assessment cache with [`DEFAULT_CACHE_CAPACITY`].
#[must_use]
pub fn assessment_cache() -> AssessmentCache {
    LruCache::new(DEFAULT_CACHE_CAPACITY)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionId;

    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruCache::new(2);
        cache.insert(1u32, "a");
        cache.insert(2u32, "b");
        let _ = cache.get(&1);

        cache.insert(3u32, "c");

        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn overwrite_does_not_evict() {
        let mut cache = LruCache::new(2);
        cache.insert(1u32, "a");
        cache.insert(2u32, "b");
        cache.insert(2u32, "b2");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek(&2), Some(&"b2"));
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let mut cache = LruCache::new(4);
        let mut calls = 0;

        let first = *cache.get_or_insert_with(7u32, || {
            calls += 1;
            "seven"
        });
        let second = *cache.get_or_insert_with(7u32, || {
            calls += 1;
            "other"
        });

        assert_eq!(first, "seven");
        assert_eq!(second, "seven");
        assert_eq!(calls, 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate_percent, 50);
    }

    #[test]
    fn peek_leaves_stats_alone() {
        let mut cache = LruCache::new(4);
        cache.insert(1u32, "a");
        let _ = cache.peek(&1);
        let _ = cache.peek(&9);
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn assessment_keys_differ_by_revision_and_scores() {
        let scores = ScoreSet::uniform(2);
        let a = AssessmentKey {
            revision: 0,
            scores: scores.clone(),
        };
        let b = AssessmentKey {
            revision: 1,
            scores: scores.clone(),
        };
        let c = AssessmentKey {
            revision: 0,
            scores: scores.with_overrides(&[(DimensionId::UserReach, 3)]),
        };
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a < b);
    }

    #[test]
    fn capacity_is_at_least_one() {
        let mut cache = LruCache::new(0);
        cache.insert(1u32, ());
        cache.insert(2u32, ());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&2));
    }
}
