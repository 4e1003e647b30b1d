//! Cache Metrics System
//!
//! Counters every cache keeps (hits, misses, evictions, insertions) and a
//! reporting trait that exports them as a `BTreeMap`.
//!
//! # Why BTreeMap over HashMap?
//!
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: demo runs and test assertions print the same way
//!
//! The performance difference is negligible with a dozen metric keys.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters tracked by [`LruCache`](crate::LruCache).
///
/// All counters are monotonically non-decreasing for the life of the cache;
/// [`clear`](crate::LruCache::clear) drops entries but keeps the counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Lookups answered from the cache.
    pub cache_hits: u64,

    /// Lookups that found no entry.
    pub cache_misses: u64,

    /// Entries removed to make room for new ones.
    pub evictions: u64,

    /// Entries added to the cache.
    pub insertions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    #[inline]
    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Records the eviction of the least recently used entry.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a new entry.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Total lookups: `cache_hits + cache_misses`.
    #[inline]
    pub fn requests(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of lookups answered from the cache, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.cache_hits as f64 / requests as f64,
        }
    }

    /// Fraction of lookups that missed, or 0.0 before the first lookup.
    pub fn miss_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.cache_misses as f64 / requests as f64,
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests() as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests() > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests() as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for cache types.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs, sorted by key.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}
