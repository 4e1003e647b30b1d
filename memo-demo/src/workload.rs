// Skewed request stream against a memoized computation

use lru_memo::{CacheMetrics, MemoCache};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use tracing::info;

/// Shape of the generated key stream.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of distinct keys
    pub unique_keys: u32,
    /// Percentage of requests aimed at the popular keys
    pub popular_traffic_percent: u8,
    /// Percentage of keys considered popular
    pub popular_keys_percent: u8,
    /// Total number of requests
    pub requests: u64,
    /// RNG seed, so runs are repeatable
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            unique_keys: 10_000,
            popular_traffic_percent: 80,
            popular_keys_percent: 20,
            requests: 100_000,
            seed: 0x5eed,
        }
    }
}

/// Stand-in for an expensive pure function: Collatz stopping time.
pub fn collatz_steps(key: &u32) -> u32 {
    let mut n = u64::from(*key).max(1);
    let mut steps = 0;
    while n != 1 {
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    steps
}

/// Generates the key stream. Popular requests pick uniformly among the first
/// `popular_keys_percent` of keys; the rest pick among the remainder.
pub fn generate_keys(config: &WorkloadConfig) -> Vec<u32> {
    let unique = config.unique_keys.max(1);
    let popular = ((unique as f64 * config.popular_keys_percent as f64 / 100.0) as u32).clamp(1, unique);
    let popular_probability = config.popular_traffic_percent as f64 / 100.0;

    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.requests)
        .map(|_| {
            if popular == unique || rng.gen::<f64>() < popular_probability {
                rng.gen_range(0..popular)
            } else {
                rng.gen_range(popular..unique)
            }
        })
        .collect()
}

/// Runs the stream through a memoized [`collatz_steps`] and returns its metrics.
pub fn run(capacity: NonZeroUsize, config: &WorkloadConfig) -> BTreeMap<String, f64> {
    let keys = generate_keys(config);
    info!(requests = keys.len(), unique_keys = config.unique_keys, "generated workload");

    let mut cache = MemoCache::new(capacity, collatz_steps);
    for key in keys {
        cache.get(key);
    }
    cache.metrics()
}
