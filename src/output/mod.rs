//! Output module for resource reports and crawl summaries
//!
//! This module handles:
//! - The `ResourceSink` interface resource records are written through
//! - CSV and in-memory sinks
//! - Crawl statistics and the end-of-run summary

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use stats::{print_summary, CrawlSummary};
pub use traits::{MemorySink, OutputError, OutputResult, ResourceRecord, ResourceSink};
