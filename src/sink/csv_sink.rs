//! CSV sink: one row per run, header written on first use.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::RecordSink;
use crate::domain::RunRecord;
use crate::error::BenchResult;

/// Row layout of the metrics file. Durations are whole milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub run_id: u32,
    pub mode: String,
    pub trace: i64,
    pub chosen_branch: String,
    pub time_trace_ms: u64,
    #[serde(rename = "time_A_ms")]
    pub time_a_ms: u64,
    #[serde(rename = "time_B_ms")]
    pub time_b_ms: u64,
    pub total_ms: u64,
    pub extra: String,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl From<&RunRecord> for CsvRow {
    fn from(record: &RunRecord) -> Self {
        Self {
            run_id: record.run_id,
            mode: record.mode.to_string(),
            trace: record.oracle_scalar,
            chosen_branch: record.chosen.to_string(),
            time_trace_ms: millis(record.oracle_elapsed),
            time_a_ms: millis(record.branch_a_elapsed),
            time_b_ms: millis(record.branch_b_elapsed),
            total_ms: millis(record.total_elapsed),
            extra: record.annotation.to_string(),
        }
    }
}

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove a previous metrics file, if any.
    pub fn truncate(path: impl AsRef<Path>) -> BenchResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn needs_header(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true)
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &RunRecord) -> BenchResult<()> {
        let has_headers = self.needs_header();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(has_headers)
            .from_writer(file);
        writer.serialize(CsvRow::from(record))?;
        writer.flush()?;
        Ok(())
    }
}

/// Read every well-formed row back. Malformed rows are skipped.
pub fn read_rows(path: impl AsRef<Path>) -> BenchResult<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(line = line + 2, error = %e, "skipping malformed row"),
        }
    }
    Ok(rows)
}
