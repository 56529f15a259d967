//! The `Sim` struct and its tick loop.

use tracing::{debug, info};

use sm_core::{CustomerId, SimClock, SimConfig, SimRng, TrajectoryRecord};
use sm_model::{ArrivalModel, ArrivalProcess, TransitionModel};

use crate::{Customer, SimObserver, SimResult, TrajectoryLog};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<A>` owns the population, the clock and the log, and drives the
/// fixed-step tick loop:
///
/// 1. **Filter**: rebuild the active set without customers already at
///    `checkout`.
/// 2. **Clock**: advance by Δt.
/// 3. **Arrivals**: draw a count for the new time and admit that many
///    customers at the entrance (skipped on the opening tick).
/// 4. **Move**: advance every active customer in admission order.
/// 5. **Record**: append one record per active customer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<A: ArrivalModel = ArrivalProcess> {
    /// Run configuration, validated by the builder.
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    pub(crate) transitions: TransitionModel,
    pub(crate) arrivals:    A,

    /// The single random source of the run.
    pub(crate) rng: SimRng,

    /// Customers in the store, in admission (and therefore id) order.
    pub(crate) active: Vec<Customer>,

    /// Id handed to the next admitted customer.
    pub(crate) next_id: CustomerId,

    pub(crate) log: TrajectoryLog,

    /// `true` once the seed customers are in and the opening tick ran.
    pub(crate) opened: bool,

    /// `true` once the log has been handed to `on_sim_end`.
    pub(crate) flushed: bool,
}

impl<A: ArrivalModel> Sim<A> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Admit the seed customers and execute the opening tick.
    ///
    /// No-op if the store is already open.
    pub fn open<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.opened {
            return Ok(());
        }
        self.step(observer)
    }

    /// Execute one tick.  The first tick of a fresh `Sim` is the opening tick.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick + 1;
        observer.on_tick_start(tick);
        let active = self.process_tick()?;
        observer.on_tick_end(tick, self.clock.now(), active);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores closing time).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Open the store if needed, tick until closing time, then hand the
    /// complete log to `observer.on_sim_end`.
    ///
    /// The log is handed over once per `Sim`; later calls are no-ops.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.flushed {
            debug!("log already flushed, run ignored");
            return Ok(());
        }
        info!(
            opening   = %self.config.opening,
            closing   = %self.config.closing,
            ticks     = self.config.tick_count(),
            customers = self.config.initial_customers,
            seed      = self.config.seed,
            "store opening"
        );

        self.open(observer)?;
        while !self.is_closed() {
            self.step(observer)?;
        }

        info!(
            ticks     = self.clock.current_tick.0,
            customers = self.next_id.0 - 1,
            records   = self.log.len(),
            "store closed"
        );
        self.flushed = true;
        observer.on_sim_end(self.clock.current_tick, self.log.records());
        Ok(())
    }

    /// `true` once the opening tick ran and the clock has reached closing
    /// time.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.opened && self.clock.now() >= self.config.closing
    }

    /// `true` once [`run`](Self::run) has handed the log to its observer.
    #[inline]
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    #[inline]
    pub fn log(&self) -> &TrajectoryLog {
        &self.log
    }

    /// Customers currently in the store, checked-out ones included until the
    /// next tick filters them.
    #[inline]
    pub fn active(&self) -> &[Customer] {
        &self.active
    }

    /// Id the next admitted customer will receive.
    #[inline]
    pub fn next_id(&self) -> CustomerId {
        self.next_id
    }

    #[inline]
    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    #[inline]
    pub fn arrivals(&self) -> &A {
        &self.arrivals
    }

    /// Consume the engine and return the log's records.
    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.log.into_records()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self) -> SimResult<usize> {
        let opening = !self.opened;
        if opening {
            for _ in 0..self.config.initial_customers {
                self.admit();
            }
            self.opened = true;
        }

        // ── Phase 1: drop customers recorded at checkout last tick ────────
        self.active = std::mem::take(&mut self.active)
            .into_iter()
            .filter(|c| !c.is_checked_out())
            .collect();

        // ── Phase 2: advance the clock ────────────────────────────────────
        self.clock.advance();
        let now = self.clock.now();

        // ── Phase 3: arrivals ─────────────────────────────────────────────
        let arrived = if opening {
            0
        } else {
            self.arrivals.draw(now.time(), &mut self.rng)?
        };
        for _ in 0..arrived {
            self.admit();
        }

        // ── Phase 4 + 5: move and record ──────────────────────────────────
        for customer in &mut self.active {
            let location = customer.advance(&self.transitions, &mut self.rng)?;
            self.log.push(TrajectoryRecord::new(now, customer.id, location));
        }

        debug!(
            tick   = %self.clock.current_tick,
            time   = %now,
            arrived,
            active = self.active.len(),
            "tick processed"
        );

        Ok(self.active.len())
    }

    fn admit(&mut self) {
        self.active.push(Customer::new(self.next_id));
        self.next_id = self.next_id.next();
    }
}
