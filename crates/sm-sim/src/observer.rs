//! Simulation observer trait for progress reporting and data collection.

use chrono::NaiveDateTime;

use sm_core::{Tick, TrajectoryRecord};

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, time: NaiveDateTime, active: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("{time}: {active} customers in store");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `time` is the timestamp the tick's records carry and `active` the
    /// number of customers that moved.
    fn on_tick_end(&mut self, _tick: Tick, _time: NaiveDateTime, _active: usize) {}

    /// Called once after the closing tick, with the complete log.
    ///
    /// This is the only place the log leaves the engine; a run that fails
    /// part-way never reaches it.
    fn on_sim_end(&mut self, _final_tick: Tick, _records: &[TrajectoryRecord]) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
