//! `LogOutputObserver<W>` — bridges `SimObserver` to a `TrajectoryWriter`.

use tracing::{debug, warn};

use sm_core::{Tick, TrajectoryRecord};
use sm_sim::SimObserver;

use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that flushes the completed trajectory log to any
/// [`TrajectoryWriter`] backend (CSV, SQLite, memory, …).
///
/// The engine hands over the log once, from `on_sim_end`, so a run that
/// fails part-way writes nothing.  Errors from the writer are stored
/// internally because `SimObserver` methods have no return value.  After
/// `sim.run()` returns, check for errors with [`take_error`][Self::take_error].
pub struct LogOutputObserver<W: TrajectoryWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: TrajectoryWriter> LogOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of records handed to the writer.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush(&mut self, records: &[TrajectoryRecord]) -> OutputResult<()> {
        self.writer.append(records)?;
        self.writer.finish()?;
        self.written += records.len();
        Ok(())
    }
}

impl<W: TrajectoryWriter> SimObserver for LogOutputObserver<W> {
    fn on_sim_end(&mut self, final_tick: Tick, records: &[TrajectoryRecord]) {
        match self.flush(records) {
            Ok(()) => debug!(tick = %final_tick, records = records.len(), "trajectory log written"),
            Err(e) => {
                warn!(error = %e, "trajectory log write failed");
                // Keep only the first error.
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
            }
        }
    }
}
