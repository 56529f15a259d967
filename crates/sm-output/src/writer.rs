//! The `TrajectoryWriter` trait implemented by all sinks.

use sm_core::TrajectoryRecord;

use crate::{OutputError, OutputResult};

/// An append-only destination for trajectory records.
///
/// Implemented by the CSV, SQLite and in-memory sinks.  Records arrive in
/// emission order and must be kept in that order.
pub trait TrajectoryWriter {
    /// Append a batch of records.
    ///
    /// Fails with [`OutputError::Finished`] once [`finish`](Self::finish)
    /// has been called.
    fn append(&mut self, records: &[TrajectoryRecord]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Collects records in memory.  Handy for tests and for callers that want
/// to post-process a run without touching the filesystem.
#[derive(Clone, Debug, Default)]
pub struct MemoryWriter {
    records:  Vec<TrajectoryRecord>,
    finished: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.records
    }
}

impl TrajectoryWriter for MemoryWriter {
    fn append(&mut self, records: &[TrajectoryRecord]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
