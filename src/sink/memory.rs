use super::RecordSink;
use crate::domain::RunRecord;
use crate::error::BenchResult;

/// Keeps records in memory; used by tests and in-process aggregation.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<RunRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &RunRecord) -> BenchResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
