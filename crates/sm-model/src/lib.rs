//! `sm-model` — probability estimation from historical trajectories.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`categorical`] | `Categorical<T>` — normalised distribution + sampler      |
//! | [`corpus`]      | `HistoryRecord`, `HistoricalCorpus` (sorted, complete)    |
//! | [`loader`]      | `;`-delimited per-day CSV loading                         |
//! | [`transition`]  | `TransitionModel` — next-location distributions           |
//! | [`arrival`]     | `ArrivalModel` trait, banded and hourly strategies        |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                            |
//!
//! # Design notes
//!
//! Models are estimated once, before a run, and are immutable afterwards.
//! The simulation borrows them read-only; every random draw goes through the
//! caller's `SimRng`, so models hold no mutable state of their own.

pub mod arrival;
pub mod categorical;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod transition;


pub use arrival::{
    ARRIVAL_BUCKETS, ArrivalModel, ArrivalProcess, Band, BandDraw, BandedArrivals, HourlyArrivals,
    arrival_bucket,
};
pub use categorical::Categorical;
pub use corpus::{HistoricalCorpus, HistoryRecord};
pub use error::{ModelError, ModelResult};
pub use loader::{day_label, load_day_csv, load_day_reader, load_days};
pub use transition::TransitionModel;
