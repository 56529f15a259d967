//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to wall-clock time is held in `SimClock`:
//!
//!   now = opening + tick * tick_duration_secs
//!
//! Using an integer tick as the canonical time unit means the clock never
//! drifts, comparisons against closing time are exact, and the hour-of-day
//! used to index arrival distributions is always derived, never stored.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.  Tick 0 is the opening time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and wall-clock timestamps.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Timestamp of tick 0.
    pub opening: NaiveDateTime,
    /// How many real seconds one tick represents.
    pub tick_duration_secs: u32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(opening: NaiveDateTime, tick_duration_secs: u32) -> Self {
        Self {
            opening,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Elapsed simulated seconds since opening.
    #[inline]
    pub fn elapsed_secs(&self) -> i64 {
        self.current_tick.0 as i64 * i64::from(self.tick_duration_secs)
    }

    /// Wall-clock timestamp of `current_tick`.
    #[inline]
    pub fn now(&self) -> NaiveDateTime {
        self.opening + TimeDelta::seconds(self.elapsed_secs())
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.now().format("%H:%M:%S"))
    }
}

// ── ArrivalStrategy ───────────────────────────────────────────────────────────

/// Which arrival model the driver builds for a run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrivalStrategy {
    /// Hand-tuned time-of-day bands.
    Banded,
    /// Per-hour distributions estimated from historical checkout counts.
    #[default]
    Empirical,
}

impl fmt::Display for ArrivalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrivalStrategy::Banded    => f.write_str("banded"),
            ArrivalStrategy::Empirical => f.write_str("empirical"),
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Loaded from a JSON file by the driver and passed to the simulation
/// builder, which calls [`validate`](Self::validate) before anything runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Timestamp of tick 0 (store opening).
    #[serde(with = "crate::timestamp")]
    pub opening: NaiveDateTime,

    /// Ticking stops once the clock reaches this timestamp.
    #[serde(with = "crate::timestamp")]
    pub closing: NaiveDateTime,

    /// Seconds per tick (Δt).
    pub tick_duration_secs: u32,

    /// Customers placed at the entrance before the opening tick.
    pub initial_customers: usize,

    /// Master RNG seed.  The same seed always produces identical logs.
    pub seed: u64,

    #[serde(default)]
    pub arrival_strategy: ArrivalStrategy,
}

impl SimConfig {
    /// Reject non-positive or inconsistent values.  Nothing is clamped.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(CoreError::Config("tick_duration_secs must be positive".into()));
        }
        if self.closing <= self.opening {
            return Err(CoreError::Config(format!(
                "closing time {} is not after opening time {}",
                self.closing, self.opening
            )));
        }
        if self.initial_customers == 0 {
            return Err(CoreError::Config("initial_customers must be positive".into()));
        }
        Ok(())
    }

    /// Number of ticks a full run executes, the opening tick included.
    pub fn tick_count(&self) -> u64 {
        let span = (self.closing - self.opening).num_seconds().max(0) as u64;
        span.div_ceil(u64::from(self.tick_duration_secs.max(1))).max(1)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.opening, self.tick_duration_secs)
    }
}
