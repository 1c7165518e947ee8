//! Dedup sets scoped to one crawl run

use dashmap::DashSet;

/// A concurrent membership set of normalized URLs
///
/// `insert` is an atomic check-then-insert, so two callers racing on the same
/// URL can never both observe it as new. Entries are never removed.
#[derive(Debug, Default)]
pub struct DedupSet {
    urls: DashSet<String>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url`, returning true if it was not present before
    pub fn insert(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Sizes of the four dedup sets at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub parsed: usize,
    pub seen: usize,
    pub found: usize,
    pub requested: usize,
}

/// Tracks crawl progress for a single run
///
/// - `parsed`: pages whose body has been processed
/// - `seen`: URLs whose MIME type has been resolved (or attempted)
/// - `found`: URLs already reported as matching resources
/// - `requested`: URLs already enqueued as follow requests
///
/// All sets grow monotonically and are dropped with the crawl.
#[derive(Debug, Default)]
pub struct CrawlState {
    pub parsed: DedupSet,
    pub seen: DedupSet,
    pub found: DedupSet,
    pub requested: DedupSet,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current size of every set
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            parsed: self.parsed.len(),
            seen: self.seen.len(),
            found: self.found.len(),
            requested: self.requested.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_if_absent() {
        let set = DedupSet::new();
        assert!(set.insert("http://example.com/a"));
        assert!(!set.insert("http://example.com/a"));
        assert!(set.contains("http://example.com/a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sets_are_independent() {
        let state = CrawlState::new();
        state.seen.insert("http://example.com/a");

        assert!(!state.parsed.contains("http://example.com/a"));
        assert!(!state.found.contains("http://example.com/a"));
        assert!(!state.requested.contains("http://example.com/a"));
        assert_eq!(
            state.snapshot(),
            StateSnapshot {
                parsed: 0,
                seen: 1,
                found: 0,
                requested: 0
            }
        );
    }

    #[test]
    fn test_concurrent_insert_single_winner() {
        let set = Arc::new(DedupSet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || set.insert("http://example.com/race"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = CrawlState::new();
        assert!(state.parsed.is_empty());
        assert_eq!(state.snapshot(), StateSnapshot::default());
    }
}
