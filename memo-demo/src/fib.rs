// Fibonacci, plain and memoized

use lru_memo::{Memo, MemoCache, Recursive};
use std::cell::Cell;
use std::num::NonZeroUsize;

/// Un-memoized recursive Fibonacci. Exponential in `n`; used as the baseline.
pub fn naive(n: u64, calls: &Cell<u64>) -> u64 {
    calls.set(calls.get() + 1);
    match n {
        0 | 1 => n,
        n => naive(n - 1, calls) + naive(n - 2, calls),
    }
}

/// Memoized Fibonacci: one cache shared by every level of the recursion.
pub type MemoFib = MemoCache<u64, u64, Recursive<FibStep>>;

pub type FibStep = fn(&mut Memo<'_, u64, u64>, &u64) -> u64;

fn step(memo: &mut Memo<'_, u64, u64>, n: &u64) -> u64 {
    match *n {
        0 | 1 => *n,
        n => memo.get(n - 1) + memo.get(n - 2),
    }
}

/// Builds a memoized Fibonacci with room for `capacity` results.
pub fn memoized(capacity: NonZeroUsize) -> MemoFib {
    MemoCache::recursive(capacity, step as FibStep)
}
