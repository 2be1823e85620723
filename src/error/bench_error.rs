//! Run-level error types.

use thiserror::Error;

/// Errors surfaced to the caller of a run or of the bench driver.
///
/// Collection timeouts and cancelled branches are recorded outcomes, not
/// errors; they never appear here.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config parse error: {0}")]
    ConfigParse(String),
    #[error("Task join error: {0}")]
    TaskJoin(String),
    #[error("Not enough data to compute speedup")]
    InsufficientData,
    #[error("Run cancelled by shutdown")]
    Cancelled,
}

impl From<tokio::task::JoinError> for BenchError {
    fn from(e: tokio::task::JoinError) -> Self {
        BenchError::TaskJoin(e.to_string())
    }
}
