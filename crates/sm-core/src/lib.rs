//! `sm-core` — foundational types for the supermarket flow simulator.
//!
//! This crate is a dependency of every other `sm-*` crate.  It intentionally
//! has no `sm-*` dependencies and few external ones (`rand`, `chrono`,
//! `serde`, `thiserror`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`location`]  | `Location` (canonical order), `CustomerState`           |
//! | [`ids`]       | `CustomerId`                                            |
//! | [`time`]      | `Tick`, `SimClock`, `SimConfig`, `ArrivalStrategy`      |
//! | [`timestamp`] | `YYYY-MM-DD HH:MM:SS` parse/render and serde adapter    |
//! | [`record`]    | `TrajectoryRecord`                                      |
//! | [`rng`]       | `SimRng` (the single random source of a run)            |
//! | [`error`]     | `CoreError`, `CoreResult`                               |

pub mod error;
pub mod ids;
pub mod location;
pub mod record;
pub mod rng;
pub mod time;
pub mod timestamp;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::CustomerId;
pub use location::{CustomerState, Location};
pub use record::TrajectoryRecord;
pub use rng::SimRng;
pub use time::{ArrivalStrategy, SimClock, SimConfig, Tick};
