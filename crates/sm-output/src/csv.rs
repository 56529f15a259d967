//! CSV output backend.
//!
//! One `;`-delimited file, header `timestamp;customer_no;location`, one row
//! per record in emission order:
//!
//! ```csv
//! timestamp;customer_no;location
//! 2022-05-04 07:01:00;1;dairy
//! 2022-05-04 07:01:00;2;fruit
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use sm_core::TrajectoryRecord;

use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// Column names, in order.
pub const HEADER: [&str; 3] = ["timestamp", "customer_no", "location"];

/// Writes the trajectory log as CSV to a file or any `io::Write`.
pub struct CsvWriter<W: Write = File> {
    writer:   Writer<W>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap any writer, e.g. a `Vec<u8>` in tests, and write the header row.
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, finished: false })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> TrajectoryWriter for CsvWriter<W> {
    fn append(&mut self, records: &[TrajectoryRecord]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        for record in records {
            self.writer.serialize(record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
