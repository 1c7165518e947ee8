//! Output sink trait and types
//!
//! This module defines the interface resource records are written through
//! and the record type itself.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One reported resource
///
/// Serializes to the CSV columns `url,mimetype,size,referrer`; the raw byte
/// count is kept for statistics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    /// Normalized absolute URL of the resource
    pub url: String,

    /// Resolved MIME type, possibly with parameters
    pub mimetype: String,

    /// Humanized Content-Length, absent when unknown
    pub size: Option<String>,

    /// URL of the page the resource was found on
    pub referrer: String,

    #[serde(skip)]
    pub bytes: Option<u64>,
}

/// Destination for resource records
///
/// Records arrive in the order they are discovered. `finish` is called once
/// after the crawl ends.
pub trait ResourceSink {
    /// Writes one record
    fn write_record(&mut self, record: &ResourceRecord) -> OutputResult<()>;

    /// Flushes buffered output
    fn finish(&mut self) -> OutputResult<()>;
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ResourceRecord>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs of the collected records, in order
    pub fn urls(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.url.as_str()).collect()
    }
}

impl ResourceSink for MemorySink {
    fn write_record(&mut self, record: &ResourceRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
