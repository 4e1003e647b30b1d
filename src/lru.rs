//! Least Recently Used (LRU) Cache Implementation
//!
//! The storage layer under [`MemoCache`](crate::MemoCache): an entry store and
//! recency list ([`RecencyList`]) plus a key index ([`Index`]), kept in
//! lockstep, with hit/miss/eviction counters.
//!
//! # Algorithm
//!
//! Entries are kept in order of recency of use. A hit moves the entry to the
//! most-recent end; when the cache is full, inserting a new key first evicts
//! the entry at the least-recent end.
//!
//! Eviction is a single routine ([`LruCache::evict`]) that pops the list node
//! and removes the same key from the index, so the index can never keep a key
//! whose node is gone.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Put: O(1)
//!   - Remove: O(1)
//!
//! - **Space Complexity**:
//!   - O(n) where n is the capacity of the cache
//!   - Nodes live in an arena; freed slots are reused, so steady-state churn
//!     does not grow memory
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! whole cache in a single `Mutex`.

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::{ConfigError, ListError};
use crate::index::{DefaultHashBuilder, Index};
use crate::list::{Iter, RecencyList};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use tracing::{debug, trace};

/// The list and index disagree. Nothing sensible can be returned from here.
#[cold]
#[track_caller]
fn corrupted(err: ListError) -> ! {
    panic!("lru cache index out of sync with recency list: {err}")
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache has a fixed capacity and supports O(1) operations for
/// inserting, retrieving, and updating entries. When the cache reaches
/// capacity, the least recently used entry is evicted to make room.
///
/// # Examples
///
/// ```
/// use lru_memo::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts the least recently used item
/// cache.put("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: RecencyList<K, V>,
    index: Index<K, S>,
    metrics: CoreCacheMetrics,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new LRU cache with the given capacity.
    pub fn new(cap: NonZeroUsize) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<LruCache<K, V, DefaultHashBuilder>, ConfigError> {
        LruCacheConfig::try_new(cap).map(|config| LruCache::init(config, None))
    }

    /// Creates a new LRU cache from a config, using a fresh default hash
    /// builder when `hasher` is `None`.
    pub fn init(
        config: LruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        debug!(capacity = cap.get(), "creating lru cache");
        LruCache {
            config: LruCacheConfig::new(cap),
            list: RecencyList::with_capacity(cap.get()),
            index: Index::with_capacity_and_hasher(cap.get(), hash_builder),
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if the cache holds `cap()` entries.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.cap().get()
    }

    /// Number of lookups answered from the cache since construction.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.metrics.cache_hits
    }

    /// Number of lookups that found no entry since construction.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.metrics.cache_misses
    }

    /// Number of entries evicted since construction.
    #[inline]
    pub fn evictions(&self) -> u64 {
        self.metrics.evictions
    }

    /// Returns the raw counters.
    #[inline]
    pub fn core_metrics(&self) -> &CoreCacheMetrics {
        &self.metrics
    }

    /// Looks up `key`, marking it most recently used.
    ///
    /// Counts a hit when the key is present and a miss otherwise.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(handle) = self.index.lookup(key) else {
            self.metrics.record_miss();
            return None;
        };
        if let Err(err) = self.list.move_to_back(handle) {
            corrupted(err);
        }
        self.metrics.record_hit();
        match self.list.get(handle) {
            Ok((_, value)) => Some(value),
            Err(err) => corrupted(err),
        }
    }

    /// Like [`get`](Self::get) but returns a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(handle) = self.index.lookup(key) else {
            self.metrics.record_miss();
            return None;
        };
        if let Err(err) = self.list.move_to_back(handle) {
            corrupted(err);
        }
        self.metrics.record_hit();
        match self.list.get_mut(handle) {
            Ok(value) => Some(value),
            Err(err) => corrupted(err),
        }
    }

    /// Returns the cached value without touching recency or counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.index.lookup(key)?;
        match self.list.get(handle) {
            Ok((_, value)) => Some(value),
            Err(err) => corrupted(err),
        }
    }

    /// Returns `true` if `key` is cached. Does not touch recency or counters.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Inserts `value` under `key` as the most recently used entry.
    ///
    /// If `key` was already cached its value is replaced and the old pair is
    /// returned. Otherwise, if the cache was full, the evicted least recently
    /// used pair is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(handle) = self.index.lookup(&key) {
            if let Err(err) = self.list.move_to_back(handle) {
                corrupted(err);
            }
            return match self.list.replace(handle, value) {
                Ok(old) => Some((key, old)),
                Err(err) => corrupted(err),
            };
        }

        let evicted = if self.is_full() { self.evict() } else { None };

        let handle = self.list.push_back(key.clone(), value);
        self.index.insert(key, handle);
        self.metrics.record_insertion();
        evicted
    }

    /// Evicts the least recently used entry, removing it from both the
    /// recency list and the index. Returns `None` when the cache is empty.
    pub fn evict(&mut self) -> Option<(K, V)> {
        let (key, value) = match self.list.pop_front() {
            Ok(entry) => entry,
            Err(ListError::EmptyList) => return None,
            Err(err) => corrupted(err),
        };
        if self.index.remove(&key).is_none() {
            corrupted(ListError::InvalidHandle);
        }
        self.metrics.record_eviction();
        trace!(
            len = self.index.len(),
            evictions = self.metrics.evictions,
            "evicted least recently used entry"
        );
        Some((key, value))
    }

    /// Removes `key` from the cache, returning its value.
    ///
    /// Explicit removal is not counted as an eviction.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.index.remove(key)?;
        match self.list.remove(handle) {
            Ok((_, value)) => Some(value),
            Err(err) => corrupted(err),
        }
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// The entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.peek_front()
    }

    /// The most recently used entry.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.peek_back()
    }

    #[cfg(any(test, debug_assertions))]
    /// Checks that list and index agree entry for entry.
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.index.len(), self.list.len(), "index/list length mismatch");
        assert!(self.len() <= self.cap().get(), "cache above capacity");
        for (key, _) in self.list.iter() {
            let handle = self
                .index
                .lookup(key)
                .unwrap_or_else(|| panic!("live node missing from index"));
            match self.list.get(handle) {
                Ok((found, _)) => assert!(found == key, "index points at a different key"),
                Err(err) => panic!("index holds a dead handle: {err}"),
            }
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, V, S> core::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .field("hits", &self.metrics.cache_hits)
            .field("misses", &self.metrics.cache_misses)
            .finish()
    }
}
