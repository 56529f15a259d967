//! Fluent builder for constructing a [`Sim`].

use chrono::{TimeDelta, Timelike};

use sm_core::{CustomerId, SimConfig, SimRng};
use sm_model::{ArrivalModel, TransitionModel};

use crate::{Sim, SimError, SimResult, TrajectoryLog};

/// Fluent builder for [`Sim<A>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — opening/closing time, Δt, seed customers, seed
/// - [`TransitionModel`] — frozen next-location distributions
/// - `A: ArrivalModel` — e.g. [`sm_model::ArrivalProcess`]
///
/// # Optional inputs (have defaults)
///
/// | Method     | Default                          |
/// |------------|----------------------------------|
/// | `.rng(r)`  | `SimRng::new(config.seed)`       |
///
/// # Example
///
/// ```rust,ignore
/// let transitions = TransitionModel::estimate(&corpus)?;
/// let arrivals = ArrivalProcess::for_strategy(config.arrival_strategy, &corpus)?;
/// let mut sim = SimBuilder::new(config, transitions, arrivals).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<A: ArrivalModel> {
    config:      SimConfig,
    transitions: TransitionModel,
    arrivals:    A,
    rng:         Option<SimRng>,
}

impl<A: ArrivalModel> SimBuilder<A> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, transitions: TransitionModel, arrivals: A) -> Self {
        Self { config, transitions, arrivals, rng: None }
    }

    /// Supply the random source instead of seeding one from `config.seed`.
    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the configuration and the arrival model's domain, and return
    /// a ready-to-open [`Sim`].
    pub fn build(self) -> SimResult<Sim<A>> {
        self.config.validate()?;
        check_coverage(&self.config, &self.arrivals)?;

        Ok(Sim {
            clock:       self.config.make_clock(),
            rng:         self.rng.unwrap_or_else(|| SimRng::new(self.config.seed)),
            config:      self.config,
            transitions: self.transitions,
            arrivals:    self.arrivals,
            active:      Vec::new(),
            next_id:     CustomerId::FIRST,
            log:         TrajectoryLog::new(),
            opened:      false,
            flushed:     false,
        })
    }
}

/// Every tick after the opening one draws arrivals at its own timestamp;
/// each of those hours must be inside the model's domain.
fn check_coverage<A: ArrivalModel>(config: &SimConfig, arrivals: &A) -> SimResult<()> {
    let step = TimeDelta::seconds(i64::from(config.tick_duration_secs));
    let mut time = config.opening + step;
    for _ in 1..config.tick_count() {
        time += step;
        let hour = time.hour() as u8;
        if !arrivals.covers(hour) {
            let hours = arrivals.hours();
            return Err(SimError::ArrivalCoverage {
                hour,
                first: *hours.start(),
                last:  *hours.end(),
            });
        }
    }
    Ok(())
}
