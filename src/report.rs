//! Human-readable summaries and speedup aggregation.

use serde::Serialize;
use std::path::Path;

use crate::domain::{RunMode, RunRecord};
use crate::error::{BenchError, BenchResult};
use crate::sink::csv_sink::read_rows;

/// Render the per-run block printed after every run.
pub fn format_summary(record: &RunRecord) -> String {
    format!(
        "--- Run {} ({}) ---\n\
         Trace={} (t_trace={} ms)\n\
         Chosen={}\n\
         tA={} ms\n\
         tB={} ms\n\
         total={} ms\n\
         extra={}",
        record.run_id,
        record.mode,
        record.oracle_scalar,
        record.oracle_elapsed.as_millis(),
        record.chosen,
        record.branch_a_elapsed.as_millis(),
        record.branch_b_elapsed.as_millis(),
        record.total_elapsed.as_millis(),
        record.annotation,
    )
}

pub fn print_summary(record: &RunRecord) {
    println!("{}", format_summary(record));
}

/// Average wall-clock per mode and the resulting speedup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchSummary {
    pub speculative_runs: usize,
    pub sequential_runs: usize,
    pub speculative_avg_ms: f64,
    pub sequential_avg_ms: f64,
    /// `sequential_avg_ms / speculative_avg_ms`; above 1.0 means speculation won.
    pub speedup: f64,
}

impl BenchSummary {
    fn from_totals(totals: impl IntoIterator<Item = (RunMode, f64)>) -> BenchResult<Self> {
        let (mut spec_sum, mut spec_runs) = (0.0, 0usize);
        let (mut seq_sum, mut seq_runs) = (0.0, 0usize);
        for (mode, total_ms) in totals {
            match mode {
                RunMode::Speculative => {
                    spec_sum += total_ms;
                    spec_runs += 1;
                }
                RunMode::Sequential => {
                    seq_sum += total_ms;
                    seq_runs += 1;
                }
            }
        }
        if spec_runs == 0 || seq_runs == 0 {
            return Err(BenchError::InsufficientData);
        }
        let speculative_avg_ms = spec_sum / spec_runs as f64;
        let sequential_avg_ms = seq_sum / seq_runs as f64;
        Ok(Self {
            speculative_runs: spec_runs,
            sequential_runs: seq_runs,
            speculative_avg_ms,
            sequential_avg_ms,
            speedup: sequential_avg_ms / speculative_avg_ms,
        })
    }

    pub fn from_records(records: &[RunRecord]) -> BenchResult<Self> {
        Self::from_totals(
            records
                .iter()
                .map(|r| (r.mode, r.total_elapsed.as_secs_f64() * 1000.0)),
        )
    }

    pub fn render(&self) -> String {
        format!(
            "---- BENCH RESULTS ----\n\
             Speculative average (ms): {:.2}\n\
             Sequential average (ms): {:.2}\n\
             Speedup: {:.4}",
            self.speculative_avg_ms, self.sequential_avg_ms, self.speedup
        )
    }
}

/// Aggregate a metrics CSV. Rows with an unknown mode are ignored.
pub fn summarize_csv(path: impl AsRef<Path>) -> BenchResult<BenchSummary> {
    let rows = read_rows(path)?;
    BenchSummary::from_totals(rows.into_iter().filter_map(|row| {
        let mode = row.mode.parse::<RunMode>().ok()?;
        Some((mode, row.total_ms as f64))
    }))
}
