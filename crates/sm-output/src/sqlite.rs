//! SQLite output backend (feature `sqlite`).
//!
//! Writes a single `trajectories` table whose columns mirror the CSV output.

use std::path::Path;

use rusqlite::Connection;

use sm_core::{TrajectoryRecord, timestamp};

use crate::{OutputError, OutputResult};
use crate::writer::TrajectoryWriter;

/// Writes the trajectory log to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS trajectories (
                 seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                 timestamp   TEXT    NOT NULL,
                 customer_no INTEGER NOT NULL,
                 location    TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl TrajectoryWriter for SqliteWriter {
    fn append(&mut self, records: &[TrajectoryRecord]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if records.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trajectories (timestamp, customer_no, location) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                stmt.execute(rusqlite::params![
                    timestamp::render(&record.timestamp),
                    record.customer.0 as i64,
                    record.location.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
