//! The historical corpus handed to the estimators.
//!
//! A corpus is a flat list of `(timestamp, session, location)` records kept
//! sorted by `(session, timestamp)` so that each session is one contiguous
//! run.  Only *complete* sessions survive construction: a session is complete
//! when its last record is `checkout` and no earlier record is.  Incomplete
//! sessions (customers still shopping when the log was cut) are dropped here
//! so that the estimators never have to handle them.
//!
//! The rule is stricter than looking at the last record alone: a session that
//! reaches `checkout` and then keeps moving is dropped as well, so `checkout`
//! never has an observed successor inside a session.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use sm_core::{Location, TrajectoryRecord};

/// One historical observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub timestamp: NaiveDateTime,
    /// Session key, unique across the whole corpus (e.g. `"mo_12"`).
    pub session:   String,
    pub location:  Location,
}

impl HistoryRecord {
    pub fn new(timestamp: NaiveDateTime, session: impl Into<String>, location: Location) -> Self {
        Self { timestamp, session: session.into(), location }
    }
}

/// Sorted, session-complete historical records.
#[derive(Clone, Debug, Default)]
pub struct HistoricalCorpus {
    records:  Vec<HistoryRecord>,
    sessions: usize,
}

impl HistoricalCorpus {
    /// Sort `records` by `(session, timestamp)` and drop incomplete sessions.
    ///
    /// The sort is stable, so records sharing a session and a timestamp keep
    /// their input order.
    pub fn from_records(mut records: Vec<HistoryRecord>) -> Self {
        records.sort_by(|a, b| a.session.cmp(&b.session).then(a.timestamp.cmp(&b.timestamp)));

        let mut kept = Vec::with_capacity(records.len());
        let mut sessions = 0usize;
        let mut dropped = 0usize;
        for session in records.chunk_by(|a, b| a.session == b.session) {
            if is_complete(session) {
                kept.extend_from_slice(session);
                sessions += 1;
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!(dropped, kept = sessions, "dropped sessions without a terminal checkout");
        }
        debug!(records = kept.len(), sessions, "historical corpus assembled");

        Self { records: kept, sessions }
    }

    /// Build a corpus from simulated output, keyed by customer id.
    ///
    /// Customers still in the store when the run closed are incomplete and
    /// dropped, exactly as for historical data.
    pub fn from_trajectories(records: &[TrajectoryRecord]) -> Self {
        Self::from_records(
            records
                .iter()
                .map(|r| HistoryRecord::new(r.timestamp, r.customer.to_string(), r.location))
                .collect(),
        )
    }

    #[inline]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Iterate sessions as contiguous, time-ordered slices.
    pub fn sessions(&self) -> impl Iterator<Item = &[HistoryRecord]> {
        self.records.chunk_by(|a, b| a.session == b.session)
    }

    #[inline]
    pub fn session_count(&self) -> usize {
        self.sessions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_complete(session: &[HistoryRecord]) -> bool {
    match session.split_last() {
        Some((last, rest)) => {
            last.location.is_terminal() && !rest.iter().any(|r| r.location.is_terminal())
        }
        None => false,
    }
}
