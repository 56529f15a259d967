//! `sm-output` — trajectory log sinks for the supermarket flow simulator.
//!
//! | Feature   | Backend  | Writer           | Output                              |
//! |-----------|----------|------------------|-------------------------------------|
//! | *(none)*  | CSV      | [`CsvWriter`]    | `;`-delimited file with header      |
//! | *(none)*  | Memory   | [`MemoryWriter`] | `Vec<TrajectoryRecord>`             |
//! | `sqlite`  | SQLite   | `SqliteWriter`   | `trajectories` table                |
//!
//! All backends implement [`TrajectoryWriter`] and are driven by
//! [`LogOutputObserver`], which implements `sm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sm_output::{CsvWriter, LogOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("simulated.csv"))?;
//! let mut obs = LogOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::LogOutputObserver;
pub use writer::{MemoryWriter, TrajectoryWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
