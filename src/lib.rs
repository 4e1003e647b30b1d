#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MemoCache<K, V, C>      get(key) -> V                       │
//! │    hit:  return stored value, refresh recency                │
//! │    miss: evict LRU if full, run C, store result              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  LruCache<K, V, S>       put / get / peek / evict / remove   │
//! │  ┌────────────────────────┐   ┌───────────────────────────┐  │
//! │  │ Index   K -> Handle    │──▶│ RecencyList  (arena)      │  │
//! │  │ (hash map)             │   │ FRONT ⇄ a ⇄ b ⇄ c ⇄ BACK  │  │
//! │  └────────────────────────┘   │  LRU            MRU       │  │
//! │                               └───────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Memoizing a function
//!
//! ```rust
//! use lru_memo::MemoCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = MemoCache::new(NonZeroUsize::new(2).unwrap(), |k: &u64| k * k);
//! assert_eq!(cache.get(3), 9);
//! assert_eq!(cache.get(3), 9);
//! assert_eq!((cache.hits(), cache.misses()), (1, 1));
//! ```
//!
//! ## Memoized recursion
//!
//! ```rust
//! use lru_memo::{Memo, MemoCache};
//! use core::num::NonZeroUsize;
//!
//! let mut fib = MemoCache::recursive(
//!     NonZeroUsize::new(50).unwrap(),
//!     |memo: &mut Memo<'_, u64, u64>, n: &u64| -> u64 {
//!         if *n < 2 { *n } else { memo.get(n - 1) + memo.get(n - 2) }
//!     },
//! );
//! assert_eq!(fib.get(35), 9_227_465);
//! assert_eq!(fib.misses(), 36);
//! ```
//!
//! ## Using the LRU store directly
//!
//! ```rust
//! use lru_memo::LruCache;
//! use lru_memo::config::LruCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(2).unwrap(),
//! };
//! let mut cache = LruCache::init(config, None);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" becomes most recently used
//! cache.put("c", 3);    // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ## Modules
//!
//! - [`memo`]: Memoizing cache controller
//! - [`lru`]: Least Recently Used store
//! - [`list`]: Handle-addressed recency list
//! - [`index`]: Key to handle index
//! - [`config`]: Configuration structures
//! - [`metrics`]: Hit, miss and eviction counters
//! - [`error`]: Error types

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

extern crate alloc;

/// Error types.
///
/// `ListError` reports misuse of a [`RecencyList`] handle; `ConfigError`
/// reports a rejected configuration value.
pub mod error;

/// Doubly linked recency list addressed by generational handles.
///
/// Nodes live in an arena with two boundary sentinels. Handles to removed
/// nodes are detected and rejected rather than dereferenced.
pub mod list;

/// Key to list-handle index.
pub mod index;

/// Cache configuration structures.
pub mod config;

/// Least Recently Used (LRU) store.
///
/// Provides a fixed-size cache that evicts the least recently used entry when
/// the capacity is reached.
pub mod lru;

/// Cache metrics system.
pub mod metrics;

/// Memoizing cache controller.
///
/// Wraps a computation and an [`LruCache`], answering repeated requests from
/// the cache and computing only on a miss.
pub mod memo;

pub use config::LruCacheConfig;
pub use error::{ConfigError, ListError};
pub use index::DefaultHashBuilder;
pub use list::{Handle, RecencyList};
pub use lru::LruCache;
pub use memo::{Compute, Fallible, Memo, MemoCache, Recursive};
pub use metrics::{CacheMetrics, CoreCacheMetrics};
