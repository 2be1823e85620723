//! Error types for the speculation engine.
//!
//! - [`BenchError`] — sink I/O, configuration, and task-join failures.

pub mod bench_error;

pub use bench_error::BenchError;

/// Convenience alias for run-level results.
pub type BenchResult<T> = Result<T, BenchError>;
