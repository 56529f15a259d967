//! Append-only, de-duplicated trajectory log.

use rustc_hash::FxHashSet;

use sm_core::TrajectoryRecord;

/// Records in emission order.  A record equal to one already held is
/// silently skipped.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryLog {
    records: Vec<TrajectoryRecord>,
    seen:    FxHashSet<TrajectoryRecord>,
}

impl TrajectoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record`; returns `false` if it was a duplicate.
    pub fn push(&mut self, record: TrajectoryRecord) -> bool {
        if !self.seen.insert(record) {
            return false;
        }
        self.records.push(record);
        true
    }

    #[inline]
    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.records
    }
}
