//! Memoizing cache controller.
//!
//! [`MemoCache`] wraps a deterministic computation and an [`LruCache`]. Each
//! [`get`](MemoCache::get) either answers from the cache (a hit, the
//! computation is not run) or runs the computation and stores the result (a
//! miss), evicting the least recently used result first when the cache is full.
//!
//! The computation is a capability, the [`Compute`] trait, rather than a
//! concrete type:
//!
//! - any `Fn(&K) -> V` closure is a `Compute`;
//! - [`Recursive`] wraps a closure that reads the same cache for other keys
//!   through a [`Memo`] handle (memoized recursion);
//! - [`Fallible`] wraps a closure returning `Result<V, E>`; errors are handed
//!   back from [`try_get`](MemoCache::try_get) unchanged and never cached.
//!
//! # Example
//!
//! ```
//! use lru_memo::MemoCache;
//! use core::num::NonZeroUsize;
//!
//! let mut squares = MemoCache::new(NonZeroUsize::new(2).unwrap(), |k: &u64| k * k);
//!
//! assert_eq!(squares.get(3), 9); // miss
//! assert_eq!(squares.get(4), 16); // miss
//! assert_eq!(squares.get(3), 9); // hit
//! assert_eq!(squares.get(5), 25); // miss, evicts 4
//! assert_eq!(squares.get(4), 16); // miss again
//! assert_eq!((squares.hits(), squares.misses()), (1, 4));
//! ```
//!
//! # Re-entrant computations
//!
//! A [`Recursive`] computation may call [`Memo::get`] for *other* keys while
//! it runs. The cache makes room before running the computation and checks
//! again before storing the result, so a nested call that refills the cache
//! cannot push it over capacity. Asking for the key currently being computed
//! recurses without bound, exactly like the un-memoized function would.

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::ConfigError;
use crate::index::DefaultHashBuilder;
use crate::lru::LruCache;
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::convert::Infallible;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::num::NonZeroUsize;
use tracing::debug;

/// A deterministic computation a [`MemoCache`] can memoize.
///
/// Implementations must return equal values for equal keys and have no
/// observable side effects; the cache relies on that to skip calls.
///
/// `memo` gives access to the cache the computation is running under, for
/// computations defined in terms of other keys. Plain computations ignore it.
pub trait Compute<K, V, E = Infallible, S = DefaultHashBuilder> {
    /// Produces the value for `key`.
    fn compute(&self, key: &K, memo: &mut Memo<'_, K, V, E, S>) -> Result<V, E>;
}

impl<K, V, S, F> Compute<K, V, Infallible, S> for F
where
    F: Fn(&K) -> V,
{
    #[inline]
    fn compute(&self, key: &K, _memo: &mut Memo<'_, K, V, Infallible, S>) -> Result<V, Infallible> {
        Ok(self(key))
    }
}

/// Adapter for computations that consult the cache for other keys.
///
/// ```
/// use lru_memo::{Memo, MemoCache};
/// use core::num::NonZeroUsize;
///
/// let mut fib = MemoCache::recursive(
///     NonZeroUsize::new(50).unwrap(),
///     |memo: &mut Memo<'_, u64, u64>, n: &u64| -> u64 {
///         match *n {
///             0 | 1 => *n,
///             n => memo.get(n - 2) + memo.get(n - 1),
///         }
///     },
/// );
/// assert_eq!(fib.get(50), 12_586_269_025);
/// ```
#[derive(Clone, Copy)]
pub struct Recursive<F>(pub F);

impl<K, V, S, F> Compute<K, V, Infallible, S> for Recursive<F>
where
    F: Fn(&mut Memo<'_, K, V, Infallible, S>, &K) -> V,
{
    #[inline]
    fn compute(&self, key: &K, memo: &mut Memo<'_, K, V, Infallible, S>) -> Result<V, Infallible> {
        Ok((self.0)(memo, key))
    }
}

/// Adapter for computations that can fail.
///
/// Failures are returned to the caller of [`MemoCache::try_get`] unchanged;
/// nothing is cached for the key and the next request computes again.
#[derive(Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<K, V, E, S, F> Compute<K, V, E, S> for Fallible<F>
where
    F: Fn(&K) -> Result<V, E>,
{
    #[inline]
    fn compute(&self, key: &K, _memo: &mut Memo<'_, K, V, E, S>) -> Result<V, E> {
        (self.0)(key)
    }
}

/// The cache as seen from inside a running computation.
///
/// Lookups through a `Memo` behave exactly like [`MemoCache::get`]: they count
/// hits and misses, refresh recency, and compute on a miss.
pub struct Memo<'a, K, V, E = Infallible, S = DefaultHashBuilder> {
    cache: &'a mut LruCache<K, V, S>,
    compute: &'a dyn Compute<K, V, E, S>,
}

impl<K, V, E, S> Memo<'_, K, V, E, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Returns the value for `key`, computing and caching it on a miss.
    pub fn try_get(&mut self, key: K) -> Result<V, E> {
        if let Some(value) = self.cache.get(&key) {
            return Ok(value.clone());
        }

        // Make room before computing. Nested lookups made by the computation
        // see the cache with the victim already gone.
        if self.cache.is_full() {
            self.cache.evict();
        }

        let compute = self.compute;
        let value = match compute.compute(&key, self) {
            Ok(value) => value,
            Err(err) => {
                debug!("computation failed; nothing cached");
                return Err(err);
            }
        };

        // `put` evicts again if nested lookups refilled the cache.
        self.cache.put(key, value.clone());
        Ok(value)
    }

    /// Returns `true` if `key` is currently cached.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.cache.contains(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<K, V, S> Memo<'_, K, V, Infallible, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Returns the value for `key`, computing and caching it on a miss.
    pub fn get(&mut self, key: K) -> V {
        match self.try_get(key) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<K, V, E, S> fmt::Debug for Memo<'_, K, V, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("cache", &self.cache).finish()
    }
}

/// A bounded memoizing cache with least-recently-used eviction.
///
/// `C` is the computation (see [`Compute`]), `E` its error type
/// ([`Infallible`] unless built with [`MemoCache::fallible`]), and `S` the
/// index hasher.
pub struct MemoCache<K, V, C, E = Infallible, S = DefaultHashBuilder> {
    cache: LruCache<K, V, S>,
    compute: C,
    _error: PhantomData<fn() -> E>,
}

impl<K, V, F> MemoCache<K, V, F>
where
    K: Hash + Eq,
    F: Fn(&K) -> V,
{
    /// Creates a cache memoizing `compute` with room for `cap` results.
    pub fn new(cap: NonZeroUsize, compute: F) -> Self {
        Self::with_hasher(LruCacheConfig::new(cap), compute, DefaultHashBuilder::default())
    }

    /// Like [`new`](Self::new) but takes a raw capacity and rejects zero.
    pub fn try_new(cap: usize, compute: F) -> Result<Self, ConfigError> {
        let config = LruCacheConfig::try_new(cap)?;
        Ok(Self::with_hasher(config, compute, DefaultHashBuilder::default()))
    }
}

impl<K, V, F> MemoCache<K, V, Recursive<F>>
where
    K: Hash + Eq,
    F: Fn(&mut Memo<'_, K, V>, &K) -> V,
{
    /// Creates a cache for a computation that looks up other keys through
    /// the [`Memo`] it is handed.
    pub fn recursive(cap: NonZeroUsize, compute: F) -> Self {
        Self::with_hasher(
            LruCacheConfig::new(cap),
            Recursive(compute),
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V, E, F> MemoCache<K, V, Fallible<F>, E>
where
    K: Hash + Eq,
    F: Fn(&K) -> Result<V, E>,
{
    /// Creates a cache for a computation that can fail. Use
    /// [`try_get`](Self::try_get) to read it.
    pub fn fallible(cap: NonZeroUsize, compute: F) -> Self {
        Self::with_hasher(
            LruCacheConfig::new(cap),
            Fallible(compute),
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V, C, E> MemoCache<K, V, C, E>
where
    K: Hash + Eq,
    C: Compute<K, V, E>,
{
    /// Creates a cache from a config and any [`Compute`] implementation.
    pub fn with_compute(config: LruCacheConfig, compute: C) -> Self {
        Self::with_hasher(config, compute, DefaultHashBuilder::default())
    }
}

impl<K, V, C, E, S> MemoCache<K, V, C, E, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a cache with a custom hasher for the key index.
    pub fn with_hasher(config: LruCacheConfig, compute: C, hash_builder: S) -> Self
    where
        C: Compute<K, V, E, S>,
    {
        MemoCache {
            cache: LruCache::with_hasher(config.capacity, hash_builder),
            compute,
            _error: PhantomData,
        }
    }

    /// Maximum number of cached results. Fixed at construction.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.cache.cap()
    }

    /// Number of cached results.
    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of `get` calls answered from the cache since construction.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.cache.hits()
    }

    /// Number of `get` calls that had to compute since construction.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.cache.misses()
    }

    /// Number of results evicted since construction.
    #[inline]
    pub fn evictions(&self) -> u64 {
        self.cache.evictions()
    }

    /// Returns `true` if a result for `key` is cached. Does not count as a lookup.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.cache.contains(key)
    }

    /// Returns the cached result for `key` without computing, counting, or
    /// refreshing it.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.cache.peek(key)
    }

    /// The underlying storage, least recently used first when iterated.
    #[inline]
    pub fn cache(&self) -> &LruCache<K, V, S> {
        &self.cache
    }

    /// Returns the computation.
    #[inline]
    pub fn compute_fn(&self) -> &C {
        &self.compute
    }
}

impl<K, V, C, E, S> MemoCache<K, V, C, E, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Compute<K, V, E, S>,
    S: BuildHasher,
{
    /// Returns the value for `key`, computing it on a miss.
    ///
    /// A failed computation is returned as is: the miss is counted, nothing
    /// is cached, and the computation is not retried.
    pub fn try_get(&mut self, key: K) -> Result<V, E> {
        let mut memo = Memo {
            cache: &mut self.cache,
            compute: &self.compute,
        };
        memo.try_get(key)
    }
}

impl<K, V, C, S> MemoCache<K, V, C, Infallible, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Compute<K, V, Infallible, S>,
    S: BuildHasher,
{
    /// Returns the value for `key`, computing it on a miss.
    ///
    /// On a hit the stored value is returned and the computation is not
    /// invoked. On a miss the least recently used result is evicted first if
    /// the cache is full.
    pub fn get(&mut self, key: K) -> V {
        match self.try_get(key) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<K, V, C, E, S> CacheMetrics for MemoCache<K, V, C, E, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.cache.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.cache.algorithm_name()
    }
}

impl<K, V, C, E, S> fmt::Debug for MemoCache<K, V, C, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
