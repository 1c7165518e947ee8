//! Crawl statistics and the end-of-run summary

use crate::mime::bytes2human;
use crate::state::StateSnapshot;
use chrono::{DateTime, Utc};

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages whose body was processed
    pub pages_parsed: u64,
    /// URLs whose MIME type was resolved or attempted
    pub urls_seen: u64,
    /// Resource records emitted
    pub resources_found: u64,
    /// Follow requests emitted, start URLs included
    pub follow_requests: u64,
    /// GETs that failed or returned a non-success status
    pub pages_failed: u64,
    /// Sum of the known sizes of reported resources
    pub total_bytes: u64,
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlSummary {
    /// Creates an empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_parsed: 0,
            urls_seen: 0,
            resources_found: 0,
            follow_requests: 0,
            pages_failed: 0,
            total_bytes: 0,
        }
    }

    /// Stamps the finish time and copies the dedup set sizes
    pub fn finish(&mut self, snapshot: StateSnapshot) {
        self.finished_at = Some(Utc::now());
        self.pages_parsed = snapshot.parsed as u64;
        self.urls_seen = snapshot.seen as u64;
        self.resources_found = snapshot.found as u64;
        self.follow_requests = snapshot.requested as u64;
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of fetched pages that could be parsed, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_parsed + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_parsed as f64 / attempted as f64) * 100.0
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Started:  {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = summary.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Overview:");
    println!("  Pages parsed: {}", summary.pages_parsed);
    println!("  Pages failed: {}", summary.pages_failed);
    println!("  URLs classified: {}", summary.urls_seen);
    println!("  Follow requests: {}", summary.follow_requests);
    println!();

    println!("Resources:");
    println!("  Found: {}", summary.resources_found);
    println!("  Known size: {}", bytes2human(summary.total_bytes));
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully parsed)",
        summary.success_rate(),
        summary.pages_parsed,
        summary.pages_parsed + summary.pages_failed
    );
}
