//! `sm-sim` — fixed-step tick loop for the supermarket flow simulator.
//!
//! # Tick loop
//!
//! ```text
//! open:  admit config.initial_customers at the entrance, then one tick
//!        without an arrival draw
//! while clock < closing:
//!   ① Filter   — drop customers whose last record was checkout
//!   ② Clock    — advance by Δt
//!   ③ Arrivals — ArrivalModel::draw(time) new customers at the entrance
//!   ④ Move     — every active customer takes one transition
//!   ⑤ Record   — one (timestamp, customer, location) row each, de-duplicated
//! close: observer.on_sim_end(final_tick, log)
//! ```
//!
//! Everything is sequential and driven by one `SimRng`, so a fixed seed
//! reproduces the log exactly.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sm_model::{ArrivalProcess, TransitionModel};
//! use sm_sim::{NoopObserver, SimBuilder};
//!
//! let transitions = TransitionModel::estimate(&corpus)?;
//! let arrivals = ArrivalProcess::for_strategy(config.arrival_strategy, &corpus)?;
//! let mut sim = SimBuilder::new(config, transitions, arrivals).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod customer;
pub mod error;
pub mod log;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use customer::Customer;
pub use error::{SimError, SimResult};
pub use log::TrajectoryLog;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
