//! Run configuration.
//!
//! [`BenchConfig`] holds every knob of a run. Missing fields fall back to the
//! defaults below when loaded from JSON, so a config file only needs the
//! values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{BenchError, BenchResult};
use crate::workloads::oracle::max_trace;

pub const DEFAULT_COMMITMENT_POLL: u64 = 100_000;
pub const DEFAULT_ENUMERATION_POLL: u64 = 1_000;
pub const DEFAULT_ORACLE_ROW_POLL: u64 = 10;

/// How many iterations a workload may run between two cancellation checks.
///
/// Larger values lower polling overhead and raise worst-case cancellation
/// latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    pub commitment: u64,
    pub enumeration: u64,
    pub oracle_rows: u64,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            commitment: DEFAULT_COMMITMENT_POLL,
            enumeration: DEFAULT_ENUMERATION_POLL,
            oracle_rows: DEFAULT_ORACLE_ROW_POLL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub oracle_dimension: usize,
    /// Exclusive upper bound of the random matrix entries.
    pub oracle_entry_bound: i64,
    pub threshold: i64,
    pub commitment_seed: String,
    pub commitment_difficulty: usize,
    pub enumeration_bound: u64,
    pub collect_timeout_ms: u64,
    pub grace_period_ms: u64,
    /// Seed for the oracle's matrix generator; `None` draws from entropy.
    pub rng_seed: Option<u64>,
    pub poll: PollIntervals,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            oracle_dimension: 100,
            oracle_entry_bound: 10,
            threshold: 1000,
            commitment_seed: "blockData".to_string(),
            commitment_difficulty: 5,
            enumeration_bound: 50_000,
            collect_timeout_ms: 60_000,
            grace_period_ms: 30,
            rng_seed: None,
            poll: PollIntervals::default(),
        }
    }
}

impl BenchConfig {
    pub fn from_json_str(raw: &str) -> BenchResult<Self> {
        let config: BenchConfig =
            serde_json::from_str(raw).map_err(|e| BenchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.poll.commitment == 0 || self.poll.enumeration == 0 || self.poll.oracle_rows == 0 {
            return Err(BenchError::InvalidConfig(
                "poll intervals must be greater than zero".into(),
            ));
        }
        if self.oracle_entry_bound < 1 {
            return Err(BenchError::InvalidConfig(
                "oracle_entry_bound must be at least 1".into(),
            ));
        }
        if max_trace(self.oracle_dimension, self.oracle_entry_bound).is_none() {
            return Err(BenchError::InvalidConfig(format!(
                "oracle trace for dimension {} with entries below {} overflows i64",
                self.oracle_dimension, self.oracle_entry_bound
            )));
        }
        if self.collect_timeout_ms == 0 {
            return Err(BenchError::InvalidConfig(
                "collect_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn collect_timeout(&self) -> Duration {
        Duration::from_millis(self.collect_timeout_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scale() {
        let config = BenchConfig::default();
        assert_eq!(config.oracle_dimension, 100);
        assert_eq!(config.threshold, 1000);
        assert_eq!(config.collect_timeout(), Duration::from_secs(60));
        assert_eq!(config.poll.commitment, 100_000);
        assert_eq!(config.poll.enumeration, 1_000);
        assert_eq!(config.poll.oracle_rows, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            BenchConfig::from_json_str(r#"{"threshold": 5, "poll": {"enumeration": 7}}"#).unwrap();
        assert_eq!(config.threshold, 5);
        assert_eq!(config.poll.enumeration, 7);
        assert_eq!(config.poll.commitment, DEFAULT_COMMITMENT_POLL);
        assert_eq!(config.commitment_seed, "blockData");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = BenchConfig::from_json_str(r#"{"poll": {"oracle_rows": 0}}"#).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = BenchConfig {
            collect_timeout_ms: 0,
            ..BenchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overflowing_oracle_bound_rejected() {
        let at_limit = BenchConfig {
            oracle_dimension: 4,
            oracle_entry_bound: (1 << 30) + 1,
            ..BenchConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let past_limit = BenchConfig {
            oracle_dimension: 8,
            ..at_limit.clone()
        };
        assert!(matches!(
            past_limit.validate(),
            Err(BenchError::InvalidConfig(_))
        ));

        let huge = BenchConfig {
            oracle_dimension: 4,
            oracle_entry_bound: i64::MAX,
            ..BenchConfig::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = BenchConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, BenchError::ConfigParse(_)));
    }
}
