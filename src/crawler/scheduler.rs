//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - FIFO queue management for URLs to fetch
//! - Handing out batches bounded by the configured fetch concurrency

use crate::config::CrawlerConfig;
use crate::crawler::{FollowRequest, RequestKind};
use std::collections::VecDeque;

/// How a fetched response is handed back to the spider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// A start URL: `parse_start_url`
    Start,
    /// A followed page: `parse_link`
    Page,
    /// A sitemap: `parse_sitemap`
    Sitemap,
}

impl From<RequestKind> for QueueKind {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Page => Self::Page,
            RequestKind::Sitemap => Self::Sitemap,
        }
    }
}

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRequest {
    /// The URL to fetch
    pub url: String,

    /// Which spider entry point handles the response
    pub kind: QueueKind,
}

impl QueuedRequest {
    pub fn start(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: QueueKind::Start,
        }
    }
}

impl From<FollowRequest> for QueuedRequest {
    fn from(request: FollowRequest) -> Self {
        Self {
            url: request.url,
            kind: request.kind.into(),
        }
    }
}

/// Scheduler manages the frontier queue
///
/// Requests are handed out in arrival order. Deduplication happens before
/// requests reach the scheduler, so every queued URL is fetched once.
#[derive(Debug)]
pub struct Scheduler {
    /// Frontier queue of URLs to fetch
    frontier: VecDeque<QueuedRequest>,

    /// Maximum number of requests per batch
    batch_size: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `initial_frontier` - Initial requests, usually the start URLs
    pub fn new(config: &CrawlerConfig, initial_frontier: Vec<QueuedRequest>) -> Self {
        Self {
            frontier: VecDeque::from(initial_frontier),
            batch_size: config.max_concurrent_fetches.max(1) as usize,
        }
    }

    /// Takes up to `batch_size` requests from the front of the queue
    ///
    /// Returns an empty batch only when the frontier is empty.
    pub fn next_batch(&mut self) -> Vec<QueuedRequest> {
        let take = self.batch_size.min(self.frontier.len());
        let batch: Vec<QueuedRequest> = self.frontier.drain(..take).collect();
        tracing::trace!(
            "Scheduled batch of {}, {} left in frontier",
            batch.len(),
            self.frontier.len()
        );
        batch
    }

    /// Adds a request to the back of the frontier
    pub fn add_to_frontier(&mut self, request: QueuedRequest) {
        self.frontier.push_back(request);
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
