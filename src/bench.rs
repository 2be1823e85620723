//! Repetition driver: `runs` speculative runs, then `runs` sequential runs.

use crate::core::Interrupt;
use crate::domain::{RunMode, RunRecord};
use crate::engine::Engine;
use crate::error::{BenchError, BenchResult};
use crate::report::print_summary;
use crate::sink::RecordSink;

pub struct BenchOptions {
    pub runs: u32,
    /// Print the per-run block after each run.
    pub verbose: bool,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            runs: 30,
            verbose: true,
        }
    }
}

/// Drive both modes, appending every record to `sink`.
///
/// The first failing run stops the driver; rows already appended stay. Once
/// the engine's shutdown scope is cancelled the driver stops with
/// [`BenchError::Cancelled`](crate::error::BenchError::Cancelled) instead of
/// recording interrupted runs.
pub async fn run_bench(
    engine: &Engine,
    options: &BenchOptions,
    sink: &mut dyn RecordSink,
) -> BenchResult<Vec<RunRecord>> {
    let mut records = Vec::with_capacity(options.runs as usize * 2);
    for mode in [RunMode::Speculative, RunMode::Sequential] {
        for run_id in 1..=options.runs {
            if engine.shutdown_scope().is_cancelled() {
                tracing::warn!(mode = %mode, run_id, "shutdown requested; stopping bench");
                return Err(BenchError::Cancelled);
            }
            let record = engine.run_and_record(run_id, mode, sink).await?;
            if options.verbose {
                print_summary(&record);
            }
            records.push(record);
        }
        tracing::info!(mode = %mode, runs = options.runs, "mode finished");
    }
    Ok(records)
}
