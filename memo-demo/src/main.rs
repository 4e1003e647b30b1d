use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lru_memo::{CacheMetrics, LruCacheConfig, MemoCache};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

mod fib;
mod workload;

/// Memoizing LRU cache demonstrations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log cache construction and evictions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare naive and memoized recursive Fibonacci
    Fib {
        /// Argument to Fibonacci
        #[arg(short, long, default_value_t = 35)]
        n: u64,

        /// Cache capacity (number of results)
        #[arg(short, long, default_value_t = 50)]
        capacity: usize,

        /// Skip the naive baseline (it is exponential in n)
        #[arg(long)]
        skip_naive: bool,
    },

    /// Memoize k * k and replay a key sequence, printing hit or miss per key
    Squares {
        /// Cache capacity (number of results)
        #[arg(short, long, default_value_t = 2)]
        capacity: usize,

        /// Keys to request, in order
        #[arg(short, long, value_delimiter = ',', default_value = "3,4,3,5,4")]
        keys: Vec<u64>,
    },

    /// Replay a skewed random key stream against a memoized computation
    Workload {
        /// Cache capacity (number of results)
        #[arg(short, long, default_value_t = 1000)]
        capacity: usize,

        /// Number of requests
        #[arg(long, default_value_t = 100_000)]
        requests: u64,

        /// Number of distinct keys
        #[arg(long, default_value_t = 10_000)]
        keys: u32,

        /// Percentage of traffic from popular keys
        #[arg(long, default_value_t = 80)]
        popular_traffic: u8,

        /// Percentage of keys that are popular
        #[arg(long, default_value_t = 20)]
        popular_keys: u8,

        /// RNG seed
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Fib {
            n,
            capacity,
            skip_naive,
        } => run_fib(n, capacity, skip_naive),
        Commands::Squares { capacity, keys } => run_squares(capacity, &keys),
        Commands::Workload {
            capacity,
            requests,
            keys,
            popular_traffic,
            popular_keys,
            seed,
        } => {
            let config = workload::WorkloadConfig {
                unique_keys: keys,
                popular_traffic_percent: popular_traffic,
                popular_keys_percent: popular_keys,
                requests,
                seed,
            };
            run_workload(capacity, &config)
        }
    }
}

fn parse_capacity(capacity: usize) -> Result<LruCacheConfig> {
    LruCacheConfig::try_new(capacity).with_context(|| format!("invalid --capacity {capacity}"))
}

fn run_fib(n: u64, capacity: usize, skip_naive: bool) -> Result<()> {
    let config = parse_capacity(capacity)?;
    info!(n, capacity, "fibonacci");

    println!("Fibonacci");
    println!("=========");

    if !skip_naive {
        let calls = Cell::new(0);
        let start = Instant::now();
        let value = fib::naive(n, &calls);
        println!(
            "naive:    fib({n}) = {value}  calls = {}  time = {:?}",
            calls.get(),
            start.elapsed()
        );
    }

    let mut memo = fib::memoized(config.capacity);
    let start = Instant::now();
    let value = memo.get(n);
    println!(
        "memoized: fib({n}) = {value}  misses = {}  hits = {}  evictions = {}  time = {:?}",
        memo.misses(),
        memo.hits(),
        memo.evictions(),
        start.elapsed()
    );
    Ok(())
}

fn run_squares(capacity: usize, keys: &[u64]) -> Result<()> {
    let config = parse_capacity(capacity)?;
    let mut cache = MemoCache::new(config.capacity, |k: &u64| k * k);

    println!("Squares (capacity {capacity})");
    println!("=======");
    for &key in keys {
        let misses = cache.misses();
        let value = cache.get(key);
        let outcome = if cache.misses() > misses { "miss" } else { "hit" };
        let resident: Vec<u64> = cache.cache().iter().map(|(k, _)| *k).collect();
        println!("get({key}) = {value:<6} {outcome:<4}  lru->mru {resident:?}");
    }
    print_metrics(&cache.metrics());
    Ok(())
}

fn run_workload(capacity: usize, config: &workload::WorkloadConfig) -> Result<()> {
    let cache_config = parse_capacity(capacity)?;
    let start = Instant::now();
    let metrics = workload::run(cache_config.capacity, config);

    println!("Workload (capacity {capacity})");
    println!("========");
    println!(
        "{} requests over {} keys, {}% of traffic on {}% of keys, {:?}",
        config.requests,
        config.unique_keys,
        config.popular_traffic_percent,
        config.popular_keys_percent,
        start.elapsed()
    );
    print_metrics(&metrics);
    Ok(())
}

fn print_metrics(metrics: &BTreeMap<String, f64>) {
    println!();
    for (name, value) in metrics {
        if name.ends_with("_rate") {
            println!("{name:<14} {:>9.2}%", value * 100.0);
        } else {
            println!("{name:<14} {value:>10}");
        }
    }
}
