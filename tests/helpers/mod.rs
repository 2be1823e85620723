#![allow(dead_code)]

use std::time::Duration;

use xspeculate::BenchConfig;

pub async fn with_timeout<F, T>(label: &str, duration: Duration, f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, f)
        .await
        .unwrap_or_else(|_| panic!("'{}' timed out after {:?}", label, duration))
}

/// Small, deterministic workloads that finish in milliseconds.
pub fn quick_config() -> BenchConfig {
    BenchConfig {
        oracle_dimension: 10,
        threshold: 1000,
        commitment_difficulty: 1,
        enumeration_bound: 5_000,
        grace_period_ms: 0,
        rng_seed: Some(2024),
        ..BenchConfig::default()
    }
}

/// Oracle entries all zero, so the trace is 0 and branch B is always chosen.
pub fn zero_oracle_config() -> BenchConfig {
    BenchConfig {
        oracle_entry_bound: 1,
        ..quick_config()
    }
}
