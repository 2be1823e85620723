//! Record sinks — where finished runs go.

pub mod csv_sink;
pub mod memory;

pub use csv_sink::{CsvRow, CsvSink};
pub use memory::MemorySink;

use crate::domain::RunRecord;
use crate::error::BenchResult;

/// Append-only destination for run records.
pub trait RecordSink: Send {
    fn append(&mut self, record: &RunRecord) -> BenchResult<()>;
}
