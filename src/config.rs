//! Cache Configuration Module
//!
//! Configuration structs have public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: `capacity` is a [`NonZeroUsize`], so a zero-sized cache
//!   cannot be expressed
//! - **Fallible path**: [`LruCacheConfig::try_new`] validates a plain `usize`
//!   coming from user input
//!
//! # Sizing Guidelines
//!
//! `capacity` is the maximum number of memoized results. Each entry costs the
//! key twice (once in the recency list, once in the index), the value, and
//! roughly 32 bytes of links and handle.
//!
//! For recursive computations (see [`Recursive`](crate::memo::Recursive)) pick
//! a capacity at least as large as the recursion's working set; a smaller
//! cache still returns correct results but recomputes evicted sub-results.
//!
//! # Examples
//!
//! ```
//! use lru_memo::config::LruCacheConfig;
//! use lru_memo::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 1000);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU cache or a memoizing cache built on one.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. Fixed for the
///   life of the cache.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Creates a config for the given capacity.
    pub const fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// Validates a raw capacity, rejecting zero.
    ///
    /// ```
    /// use lru_memo::config::LruCacheConfig;
    ///
    /// assert_eq!(LruCacheConfig::try_new(8).unwrap().capacity.get(), 8);
    /// assert!(LruCacheConfig::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(ConfigError::new("capacity must be greater than zero"))
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl TryFrom<usize> for LruCacheConfig {
    type Error = ConfigError;

    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        Self::try_new(capacity)
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
