//! Shared Access Tests
//!
//! Neither cache synchronizes internally. These tests share one cache between
//! worker threads behind a single `Mutex`, so every call (lookups included)
//! is serialized, and check that counters and structure stay exact.

use lru_memo::{LruCache, MemoCache};
use scoped_threadpool::Pool;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const THREADS: u32 = 8;
const OPS_PER_THREAD: u64 = 2_000;

#[test]
fn test_memo_cache_behind_mutex() {
    let computations = AtomicU64::new(0);
    let cache = Mutex::new(MemoCache::new(NonZeroUsize::new(32).unwrap(), |k: &u64| {
        computations.fetch_add(1, Ordering::Relaxed);
        k * k
    }));

    let mut pool = Pool::new(THREADS);
    pool.scoped(|scope| {
        for t in 0..THREADS {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (i * 7 + u64::from(t)) % 48;
                    let value = cache.lock().unwrap().get(key);
                    assert_eq!(value, key * key);
                }
            });
        }
    });

    let cache = cache.into_inner().unwrap();
    assert_eq!(cache.hits() + cache.misses(), u64::from(THREADS) * OPS_PER_THREAD);
    assert_eq!(cache.misses(), computations.load(Ordering::Relaxed));
    assert!(cache.len() <= 32);
    cache.cache().debug_validate_invariants();
}

#[test]
fn test_lru_store_behind_mutex() {
    let cache: Mutex<LruCache<u32, u32>> = Mutex::new(LruCache::new(NonZeroUsize::new(16).unwrap()));

    let mut pool = Pool::new(THREADS);
    pool.scoped(|scope| {
        for t in 0..THREADS {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..OPS_PER_THREAD as u32 {
                    let key = (i + t * 3) % 40;
                    let mut guard = cache.lock().unwrap();
                    match guard.get(&key) {
                        Some(value) => assert_eq!(*value, key + 1),
                        None => {
                            guard.put(key, key + 1);
                        }
                    }
                }
            });
        }
    });

    let cache = cache.into_inner().unwrap();
    assert_eq!(cache.len(), 16);
    assert_eq!(cache.hits() + cache.misses(), u64::from(THREADS) * OPS_PER_THREAD);
    assert_eq!(cache.core_metrics().insertions, cache.misses());
    cache.debug_validate_invariants();
}
