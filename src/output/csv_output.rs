//! CSV output handler
//!
//! Writes one row per resource record under the header
//! `url,mimetype,size,referrer`.

use super::traits::{OutputResult, ResourceRecord, ResourceSink};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// CSV sink over any writer
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    location: Option<PathBuf>,
    rows: u64,
}

impl CsvSink<File> {
    /// Creates (or truncates) the CSV file at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Output file path; parent directories must exist
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        let writer = csv::Writer::from_path(path)?;
        tracing::info!("CSV output file location: {}", path.display());

        Ok(Self {
            writer,
            location: Some(path.to_path_buf()),
            rows: 0,
        })
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            location: None,
            rows: 0,
        }
    }

    /// Number of rows written so far, header excluded
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Flushes and returns the inner writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| super::OutputError::Write(e.to_string()))
    }
}

impl<W: Write> ResourceSink for CsvSink<W> {
    fn write_record(&mut self, record: &ResourceRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        if let Some(location) = &self.location {
            tracing::debug!("Wrote {} resource rows to {}", self.rows, location.display());
        }
        Ok(())
    }
}
