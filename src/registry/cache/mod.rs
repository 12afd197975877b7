//! Lookup caching for the operation registry

pub mod config;
pub mod stats;

pub use config::CacheConfig;
pub use stats::{CacheSnapshot, CacheStatistics};

use dashmap::DashMap;
use std::fmt;
use std::hash::Hash;

/// Thread-safe memo of lookup results, including negative ones
///
/// A stored `None` records that a lookup found nothing, so repeated failed
/// lookups do not rescan the registered operations. Concurrent misses for the
/// same key may compute the value twice; the last write wins.
pub struct LookupCache<K, V> {
    entries: DashMap<K, Option<V>>,
    stats: CacheStatistics,
    config: CacheConfig,
}

impl<K, V> fmt::Debug for LookupCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupCache")
            .field("cache_size", &self.entries.len())
            .field("stats", &self.stats)
            .field("config", &self.config)
            .finish()
    }
}

impl<K, V> LookupCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new lookup cache
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::with_capacity(config.lookup_cache_size),
            stats: CacheStatistics::new(),
            config: config.clone(),
        }
    }

    /// Get a cached result; the outer `None` means the key was never computed
    pub fn get(&self, key: &K) -> Option<Option<V>> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        Some(entry.value().clone())
    }

    /// Store a computed result
    pub fn insert(&self, key: K, value: Option<V>) {
        if !self.config.enable_caching {
            return;
        }

        if self.config.is_bounded()
            && self.entries.len() >= self.config.lookup_cache_size
            && !self.entries.contains_key(&key)
        {
            // Evict an arbitrary entry; results are pure so it is only recomputed
            let victim = self.entries.iter().next().map(|entry| entry.key().clone());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key, value);
    }

    /// Return the cached result for `key`, computing and storing it on a miss
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> Option<V>
    where
        F: FnOnce() -> Option<V>,
    {
        if let Some(cached) = self.get(&key) {
            return cached;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached result
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Hit/miss statistics of this cache
    pub fn stats(&self) -> &CacheStatistics {
        &self.stats
    }
}
