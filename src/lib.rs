//! # XSpeculate — speculative branch execution benchmark
//!
//! `xspeculate` measures whether running two mutually exclusive CPU-bound
//! branches *speculatively*, in parallel with the decision that picks one of
//! them, beats deciding first and running only the winner.
//!
//! - **Workloads**: a hash-prefix commitment search (branch A), a prime
//!   enumeration (branch B), and a matrix-trace oracle. All three poll a
//!   cooperative cancellation capability at bounded intervals.
//! - **Speculative orchestrator**: launches all three, blocks only on the
//!   oracle, cancels the loser, collects the winner under a timeout, and
//!   salvages the loser's timing if it already finished.
//! - **Sequential baseline**: oracle first, then only the chosen branch.
//! - **Sinks and reports**: CSV metrics rows and speedup aggregation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xspeculate::{BenchConfig, Engine, RunMode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Engine::new(BenchConfig::default()).unwrap();
//!     let record = engine.run(1, RunMode::Speculative).await.unwrap();
//!     println!("{}", xspeculate::report::format_summary(&record));
//! }
//! ```

pub mod bench;
pub mod config;
pub mod core;
pub mod domain;
pub mod engine;
pub mod error;
pub mod report;
pub mod sink;
pub mod workloads;

pub use crate::bench::{run_bench, BenchOptions};
pub use crate::config::{BenchConfig, PollIntervals};
pub use crate::core::{CancelScope, CancelSignal, Interrupt, NeverCancel};
pub use crate::domain::{Annotation, Branch, RunMode, RunRecord};
pub use crate::engine::{
    run, run_sequential, until_signal, Engine, Phase, SpeculativeOrchestrator,
};
pub use crate::error::{BenchError, BenchResult};
pub use crate::report::{summarize_csv, BenchSummary};
pub use crate::sink::{CsvSink, MemorySink, RecordSink};
