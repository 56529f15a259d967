//! CSV corpus loader.
//!
//! # CSV format
//!
//! One file per shopping day, `;`-delimited, one row per observation.
//! Customer numbers restart at 1 every day.
//!
//! ```csv
//! timestamp;customer_no;location
//! 2019-09-02 07:03:00;1;dairy
//! 2019-09-02 07:03:00;2;dairy
//! 2019-09-02 07:04:00;1;checkout
//! ```
//!
//! Each day is given a label (the first two letters of the day name, e.g.
//! `mo`) and session keys become `"{label}_{customer_no}"`, so sessions from
//! different days never merge.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::info;

use sm_core::Location;

use crate::{HistoricalCorpus, HistoryRecord, ModelError, ModelResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DayRecord {
    #[serde(with = "sm_core::timestamp")]
    timestamp:   NaiveDateTime,
    customer_no: u32,
    location:    Location,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Session label for a day file: its first two characters (`"monday"` → `"mo"`).
pub fn day_label(day: &str) -> String {
    day.chars().take(2).collect()
}

/// Load one day's records from a CSV file.
pub fn load_day_csv(path: &Path, label: &str) -> ModelResult<Vec<HistoryRecord>> {
    let file = std::fs::File::open(path).map_err(ModelError::Io)?;
    load_day_reader(file, label)
}

/// Like [`load_day_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded fixtures.
pub fn load_day_reader<R: Read>(reader: R, label: &str) -> ModelResult<Vec<HistoryRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<DayRecord>()
        .map(|result| {
            let row = result.map_err(|e| ModelError::Parse(e.to_string()))?;
            Ok(HistoryRecord::new(row.timestamp, format!("{label}_{}", row.customer_no), row.location))
        })
        .collect()
}

/// Load `{dir}/{day}.csv` for every day in `days` and assemble a corpus.
pub fn load_days(dir: &Path, days: &[String]) -> ModelResult<HistoricalCorpus> {
    let mut records = Vec::new();
    for day in days {
        let path = dir.join(format!("{day}.csv"));
        let rows = load_day_csv(&path, &day_label(day))?;
        info!(day = %day, rows = rows.len(), "loaded day file");
        records.extend(rows);
    }
    Ok(HistoricalCorpus::from_records(records))
}
