//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DedupSet`: a concurrent, insert-only set of normalized URLs
//! - `CrawlState`: the parsed/seen/found/requested sets of one crawl run

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, DedupSet, StateSnapshot};
