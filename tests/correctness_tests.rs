//! Correctness Tests for the Memoizing LRU Cache
//!
//! Validates eviction order, hit/miss accounting and memoization using small,
//! predictable access patterns. Each eviction test checks explicitly which
//! key left the cache.
//!
//! ## Test Strategy
//! - Small cache sizes (2-5 entries) for predictable behavior
//! - Call-counting computations to observe when compute actually runs
//! - Invariant validation after every step of longer sequences

use lru_memo::config::LruCacheConfig;
use lru_memo::{Compute, Fallible, LruCache, Memo, MemoCache};
use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::num::NonZeroUsize;

// ============================================================================
// HELPER FUNCTIONS FOR CACHE CREATION
// ============================================================================

fn cap(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// Helper to create an LruCache with the given capacity
fn make_lru<K: std::hash::Hash + Eq + Clone, V>(n: usize) -> LruCache<K, V> {
    let config = LruCacheConfig { capacity: cap(n) };
    LruCache::init(config, None)
}

/// Keys currently cached, least recently used first
fn resident<K: Copy, V, C, E>(cache: &MemoCache<K, V, C, E>) -> Vec<K>
where
    K: std::hash::Hash + Eq,
{
    cache.cache().iter().map(|(k, _)| *k).collect()
}

// ============================================================================
// LRU STORE CORRECTNESS
// ============================================================================
// The store evicts the Least Recently Used entry.
// Correctness criteria:
// 1. Most recently accessed entries stay in cache
// 2. Oldest accessed entries are evicted first
// 3. Access (get) updates recency, preventing eviction

#[test]
fn test_lru_evicts_least_recently_used() {
    let mut cache = make_lru(3);

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);
    // LRU order: 1 (LRU) -> 2 -> 3 (MRU)

    // Insert new key - should evict key 1 (LRU)
    assert_eq!(cache.put(4, 40), Some((1, 10)));
    assert!(cache.peek(&1).is_none(), "Key 1 should have been evicted");
    assert!(cache.contains(&2) && cache.contains(&3) && cache.contains(&4));
    cache.debug_validate_invariants();
}

#[test]
fn test_lru_eviction_order_is_predictable() {
    let mut cache = make_lru(5);

    for i in 0..5 {
        cache.put(i, i * 10);
    }

    for (inserted, evicted) in (5..8).zip(0..3) {
        assert_eq!(cache.put(inserted, inserted * 10), Some((evicted, evicted * 10)));
        assert_eq!(cache.len(), 5);
    }

    let keys: Vec<i32> = cache.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [3, 4, 5, 6, 7]);
    assert_eq!(cache.evictions(), 3);
}

#[test]
fn test_lru_get_updates_recency() {
    let mut cache = make_lru(3);

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);

    // Access key 1 to make it recently used
    assert_eq!(cache.get(&1), Some(&10));
    // LRU order: 2 (LRU) -> 3 -> 1 (MRU)

    cache.put(4, 40);
    assert!(cache.contains(&1), "Key 1 should survive due to recent access");
    assert!(!cache.contains(&2), "Key 2 should be evicted");
    assert_eq!(cache.peek_lru(), Some((&3, &30)));
    assert_eq!(cache.peek_mru(), Some((&4, &40)));
}

#[test]
fn test_lru_put_existing_key_replaces_without_eviction() {
    let mut cache = make_lru(2);
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.put("a", 10), Some(("a", 1)));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.evictions(), 0);
    // "a" was refreshed, so "b" goes next
    assert_eq!(cache.evict(), Some(("b", 2)));
    assert_eq!(cache.peek(&"a"), Some(&10));
}

#[test]
fn test_lru_index_and_list_stay_in_lockstep() {
    let mut cache = make_lru(4);
    for i in 0..200u32 {
        match i % 5 {
            0 | 1 | 2 => {
                cache.put(i % 11, i);
            }
            3 => {
                cache.get(&(i % 7));
            }
            _ => {
                cache.remove(&(i % 3));
            }
        }
        assert!(cache.len() <= 4);
        cache.debug_validate_invariants();
    }
}

// ============================================================================
// MEMO CACHE CORRECTNESS
// ============================================================================
// MemoCache answers repeated keys from the cache and computes only on a miss.
// Correctness criteria:
// 1. hits + misses == number of get calls
// 2. compute runs exactly once per miss and never on a hit
// 3. eviction follows recency of get, not of insertion

#[test]
fn test_memo_squares_scenario() {
    let mut cache = MemoCache::new(cap(2), |k: &u64| k * k);

    let expected = [(3, 9, "miss"), (4, 16, "miss"), (3, 9, "hit"), (5, 25, "miss"), (4, 16, "miss")];
    for (key, value, outcome) in expected {
        let misses = cache.misses();
        assert_eq!(cache.get(key), value);
        let observed = if cache.misses() > misses { "miss" } else { "hit" };
        assert_eq!(observed, outcome, "get({key})");
    }

    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.misses(), 4);
    assert_eq!(cache.evictions(), 2);
    assert_eq!(resident(&cache), [5, 4]);
}

#[test]
fn test_memo_access_refreshes_recency() {
    // A, B, A, C with capacity 2 evicts B
    let mut cache = MemoCache::new(cap(2), |k: &char| k.to_ascii_lowercase());
    cache.get('A');
    cache.get('B');
    cache.get('A');
    cache.get('C');

    assert_eq!(resident(&cache), ['A', 'C']);
    assert!(!cache.contains(&'B'));
}

#[test]
fn test_memo_fills_to_capacity_and_no_further() {
    let mut cache = MemoCache::new(cap(5), |k: &u32| k + 1);
    for k in 0..5 {
        cache.get(k);
        assert_eq!(cache.len(), k as usize + 1);
    }
    for k in 5..50 {
        cache.get(k);
        assert_eq!(cache.len(), 5);
    }
    assert_eq!(cache.evictions(), 45);
    assert_eq!(resident(&cache), [45, 46, 47, 48, 49]);
}

#[test]
fn test_memo_compute_runs_once_per_miss() {
    let calls = RefCell::new(Vec::new());
    let mut cache = MemoCache::new(cap(3), |k: &u32| {
        calls.borrow_mut().push(*k);
        k * 3
    });

    let keys = [1, 2, 1, 1, 3, 2, 4, 1, 5, 2];
    for &k in &keys {
        assert_eq!(cache.get(k), k * 3);
    }

    assert_eq!(cache.hits() + cache.misses(), keys.len() as u64);
    assert_eq!(calls.borrow().len() as u64, cache.misses());
    // 4 evicts 1, then 1 evicts 3, 5 evicts 2 and 2 evicts 4
    assert_eq!(*calls.borrow(), [1, 2, 3, 4, 1, 5, 2]);
}

#[test]
fn test_memo_repeated_get_is_hit_with_same_value() {
    let calls = Cell::new(0);
    let mut cache = MemoCache::new(cap(1), |s: &String| {
        calls.set(calls.get() + 1);
        s.len()
    });
    assert_eq!(cache.get("hello".to_string()), 5);
    assert_eq!(cache.get("hello".to_string()), 5);
    assert_eq!(calls.get(), 1);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));
    assert_eq!(cache.peek("hello"), Some(&5));
}

#[test]
fn test_memo_peek_and_contains_are_silent() {
    let mut cache = MemoCache::new(cap(2), |k: &u8| *k);
    cache.get(1);
    cache.get(2);

    assert_eq!(cache.peek(&1), Some(&1));
    assert!(cache.contains(&1));
    assert_eq!((cache.hits(), cache.misses()), (0, 2));

    // peek did not refresh 1, so it is evicted
    cache.get(3);
    assert!(!cache.contains(&1));
}

#[test]
fn test_memo_zero_capacity_rejected() {
    let err = MemoCache::try_new(0, |k: &u8| *k).unwrap_err();
    assert!(err.to_string().contains("capacity"));
    assert!(LruCache::<u8, u8>::try_new(0).is_err());
}

// ============================================================================
// RECURSIVE AND FALLIBLE COMPUTATIONS
// ============================================================================

#[test]
fn test_recursive_fibonacci_35() {
    let mut fib = MemoCache::recursive(cap(50), |memo: &mut Memo<'_, u64, u64>, n: &u64| -> u64 {
        match *n {
            0 | 1 => *n,
            n => memo.get(n - 1) + memo.get(n - 2),
        }
    });

    assert_eq!(fib.get(35), 9_227_465);
    assert_eq!(fib.misses(), 36);
    assert_eq!(fib.len(), 36);
    fib.cache().debug_validate_invariants();
}

#[test]
fn test_recursive_nested_lookups_respect_capacity() {
    // Each key needs the two keys below it; capacity is smaller than the chain.
    let calls = Cell::new(0u32);
    let mut sums = MemoCache::recursive(cap(4), |memo: &mut Memo<'_, u32, u64>, n: &u32| -> u64 {
        calls.set(calls.get() + 1);
        assert!(memo.len() <= 4);
        match *n {
            0 => 0,
            n => u64::from(n) + memo.get(n - 1),
        }
    });

    assert_eq!(sums.get(30), 465);
    assert!(sums.len() <= 4);
    assert_eq!(sums.misses(), u64::from(calls.get()));
    sums.cache().debug_validate_invariants();

    // A fresh top-level request for a still-cached key is a hit.
    let hits = sums.hits();
    assert_eq!(sums.get(30), 465);
    assert_eq!(sums.hits(), hits + 1);
}

#[test]
fn test_fallible_failure_propagates_and_is_retried() {
    let attempts = Cell::new(0);
    let mut cache = MemoCache::fallible(cap(2), |k: &u32| -> Result<u32, String> {
        attempts.set(attempts.get() + 1);
        if attempts.get() == 1 {
            Err(format!("transient failure for {k}"))
        } else {
            Ok(k * 2)
        }
    });

    assert_eq!(cache.try_get(7), Err("transient failure for 7".to_string()));
    assert!(!cache.contains(&7));
    assert_eq!(cache.misses(), 1);

    assert_eq!(cache.try_get(7), Ok(14));
    assert_eq!(cache.try_get(7), Ok(14));
    assert_eq!(attempts.get(), 2);
    assert_eq!((cache.hits(), cache.misses()), (1, 2));
}

#[test]
fn test_fallible_failure_after_eviction_keeps_structures_consistent() {
    let mut cache = MemoCache::fallible(cap(1), |k: &i32| if *k < 0 { Err(()) } else { Ok(*k) });
    assert_eq!(cache.try_get(1), Ok(1));
    // full: the miss evicts 1 before the computation fails
    assert_eq!(cache.try_get(-1), Err(()));
    assert!(cache.is_empty());
    assert_eq!(cache.evictions(), 1);
    cache.cache().debug_validate_invariants();
}

/// Computation carrying its own state, implemented directly on the trait.
struct Lookup {
    table: Vec<&'static str>,
}

impl Compute<usize, &'static str, Infallible> for Lookup {
    fn compute(&self, key: &usize, _memo: &mut Memo<'_, usize, &'static str>) -> Result<&'static str, Infallible> {
        Ok(self.table[*key % self.table.len()])
    }
}

#[test]
fn test_custom_compute_type() {
    let mut cache = MemoCache::with_compute(
        LruCacheConfig::new(cap(2)),
        Lookup {
            table: vec!["zero", "one", "two"],
        },
    );
    assert_eq!(cache.get(4), "one");
    assert_eq!(cache.get(4), "one");
    assert_eq!(cache.compute_fn().table.len(), 3);
    assert_eq!(cache.hits(), 1);
}

#[test]
fn test_fallible_adapter_with_with_compute() {
    let mut cache: MemoCache<u8, u8, _, &str> = MemoCache::with_compute(
        LruCacheConfig::new(cap(2)),
        Fallible(|k: &u8| k.checked_mul(2).ok_or("overflow")),
    );
    assert_eq!(cache.try_get(200), Err("overflow"));
    assert_eq!(cache.try_get(100), Ok(200));
}
