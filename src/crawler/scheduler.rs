//! Scheduler for the crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pending listing and detail requests
//! - Global concurrency limiting via a semaphore
//! - The politeness delay between consecutive dispatches
//!
//! There is no visited set: a URL discovered twice is fetched twice.

use crate::config::CrawlerConfig;
use crate::state::CrawlRequest;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// A request cleared for fetching
///
/// The permit is moved into the fetch task and released when the task ends.
pub struct ScheduledFetch {
    /// The request to fetch
    pub request: CrawlRequest,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Scheduler manages the frontier queue and dispatch pacing
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Pending requests, oldest first
    frontier: VecDeque<CrawlRequest>,

    /// Minimum time between two dispatches
    download_delay: Duration,

    /// When the last request was handed out
    last_dispatch: Option<Instant>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `initial_frontier` - Initial requests, normally one listing request per seed
    pub fn new(config: &CrawlerConfig, initial_frontier: Vec<CrawlRequest>) -> Self {
        let permits = config.max_concurrent_requests.max(1) as usize;

        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            frontier: initial_frontier.into(),
            download_delay: Duration::from_millis(config.download_delay_ms),
            last_dispatch: None,
        }
    }

    /// Hands out the next request if one is pending and a permit is free
    ///
    /// Never waits for a permit: the coordinator calls this again after an
    /// in-flight fetch completes. It does wait out the politeness delay.
    /// Dropping the future mid-wait releases the permit and leaves the
    /// frontier untouched.
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A request that may be fetched now
    /// * `None` - The frontier is empty or every permit is in use
    pub async fn next_request(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        self.wait_for_delay().await;

        let request = self.frontier.pop_front()?;
        self.last_dispatch = Some(Instant::now());
        tracing::trace!("Dispatching {} {}", request.kind, request.url);

        Some(ScheduledFetch { request, permit })
    }

    async fn wait_for_delay(&self) {
        if self.download_delay.is_zero() {
            return;
        }
        if let Some(last) = self.last_dispatch {
            tokio::time::sleep_until(last + self.download_delay).await;
        }
    }

    /// Adds a request to the back of the frontier
    pub fn add_to_frontier(&mut self, request: CrawlRequest) {
        self.frontier.push_back(request);
    }

    /// Returns the number of pending requests
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns true if no request is pending
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Drops every pending request, returning how many there were
    pub fn clear(&mut self) -> usize {
        let dropped = self.frontier.len();
        self.frontier.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn create_test_config(max_concurrent_requests: u32, download_delay_ms: u64) -> CrawlerConfig {
        CrawlerConfig {
            max_concurrent_requests,
            download_delay_ms,
            request_timeout_secs: 30,
        }
    }

    fn listing(path: &str) -> CrawlRequest {
        let url = Url::parse("https://www.fazwaz.my").unwrap().join(path).unwrap();
        CrawlRequest::listing(url, 0)
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let mut scheduler = Scheduler::new(
            &create_test_config(4, 0),
            vec![listing("/a"), listing("/b")],
        );
        scheduler.add_to_frontier(listing("/c"));
        assert_eq!(scheduler.frontier_size(), 3);

        let mut seen = Vec::new();
        while let Some(fetch) = scheduler.next_request().await {
            seen.push(fetch.request.url.path().to_string());
        }
        assert_eq!(seen, vec!["/a", "/b", "/c"]);
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn test_empty_frontier() {
        let mut scheduler = Scheduler::new(&create_test_config(4, 0), Vec::new());
        assert!(scheduler.next_request().await.is_none());
    }

    #[tokio::test]
    async fn test_permits_bound_dispatch() {
        let mut scheduler = Scheduler::new(
            &create_test_config(2, 0),
            vec![listing("/a"), listing("/b"), listing("/c")],
        );

        let first = scheduler.next_request().await.unwrap();
        let _second = scheduler.next_request().await.unwrap();
        assert!(scheduler.next_request().await.is_none());
        assert_eq!(scheduler.frontier_size(), 1);

        drop(first);
        let third = scheduler.next_request().await.unwrap();
        assert_eq!(third.request.url.path(), "/c");
    }

    #[tokio::test]
    async fn test_download_delay_spaces_dispatches() {
        let mut scheduler = Scheduler::new(
            &create_test_config(4, 50),
            vec![listing("/a"), listing("/b")],
        );

        let start = Instant::now();
        let _a = scheduler.next_request().await.unwrap();
        let _b = scheduler.next_request().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new(
            &create_test_config(1, 0),
            vec![listing("/a"), listing("/b")],
        );
        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.is_empty());
    }
}
