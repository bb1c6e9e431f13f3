//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier and the sinks. Fetch tasks run on a
//! `JoinSet`; each one fetches a page, applies its transition and hands the
//! outcome back. Only the coordinator mutates the frontier or writes records,
//! so tasks share nothing but the read-only [`RunContext`] and the client.

use crate::config::Config;
use crate::crawler::scheduler::{ScheduledFetch, Scheduler};
use crate::crawler::transition::{transition, PageOutcome};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::listing::ListingRecord;
use crate::output::RecordSink;
use crate::state::{CrawlRequest, RunContext};
use crate::storage::RunStatus;
use crate::SewaError;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Counters for one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Listing pages fetched and parsed
    pub listing_pages: u64,

    /// Detail pages fetched and extracted
    pub detail_pages: u64,

    /// Records handed to the sinks
    pub records_emitted: u64,

    /// Requests dropped after a network, HTTP or content-type failure
    pub fetch_failures: u64,

    /// Individual sink writes that failed
    pub sink_failures: u64,

    /// Discovered links dropped for leaving the allowed hosts
    pub offsite_links: u64,

    /// Listing pages walked by each seed's pagination chain, in seed order
    pub pages_per_seed: Vec<u64>,

    /// How the run ended
    pub status: RunStatus,
}

impl CrawlReport {
    fn new(seeds: usize) -> Self {
        Self {
            listing_pages: 0,
            detail_pages: 0,
            records_emitted: 0,
            fetch_failures: 0,
            sink_failures: 0,
            offsite_links: 0,
            pages_per_seed: vec![0; seeds],
            status: RunStatus::Running,
        }
    }
}

/// Result of one fetch task
struct TaskOutcome {
    request: CrawlRequest,
    result: Result<PageOutcome, String>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<RunContext>,
    client: Client,
    scheduler: Scheduler,
    sinks: Vec<Box<dyn RecordSink>>,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `ctx` - The run context shared by every fetch task
    /// * `seeds` - Seed listing URLs, one pagination chain each
    /// * `sinks` - Destinations for the emitted records
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SewaError)` - The HTTP client could not be built; the sinks
    ///   have been finalized with [`RunStatus::Failed`]
    pub fn new(
        config: &Config,
        ctx: RunContext,
        seeds: Vec<Url>,
        mut sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self, SewaError> {
        let client = match build_http_client(&config.user_agent, &config.crawler) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Cannot build HTTP client: {}", e);
                for sink in &mut sinks {
                    if let Err(err) = sink.finalize(RunStatus::Failed) {
                        tracing::error!("Failed to finalize {} sink: {}", sink.name(), err);
                    }
                }
                return Err(e.into());
            }
        };

        let initial: Vec<CrawlRequest> = seeds
            .into_iter()
            .enumerate()
            .map(|(seed, url)| CrawlRequest::listing(url, seed))
            .collect();
        let report = CrawlReport::new(initial.len());

        Ok(Self {
            ctx: Arc::new(ctx),
            client,
            scheduler: Scheduler::new(&config.crawler, initial),
            sinks,
            report,
        })
    }

    /// Runs until the frontier is exhausted
    pub async fn run(self) -> Result<CrawlReport, SewaError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs until the frontier is exhausted or `shutdown` completes
    ///
    /// On shutdown no further request is dispatched, in-flight fetches are
    /// aborted and the sinks are finalized with [`RunStatus::Interrupted`].
    /// Shutdown is also observed while dispatch waits out the politeness
    /// delay.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<CrawlReport, SewaError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "Starting crawl of {} seed(s) at {}",
            self.report.pages_per_seed.len(),
            self.ctx.fetched_at()
        );
        tracing::debug!(
            "Allowed domains: {}",
            self.ctx.allowed_hosts().domains().join(", ")
        );

        let start_time = Instant::now();
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();
        let mut status = RunStatus::Completed;
        tokio::pin!(shutdown);

        'crawl: loop {
            loop {
                let next = tokio::select! {
                    _ = &mut shutdown => {
                        status = RunStatus::Interrupted;
                        break 'crawl;
                    }
                    next = self.scheduler.next_request() => next,
                };
                let Some(scheduled) = next else {
                    break;
                };
                tasks.spawn(fetch_page(
                    self.client.clone(),
                    Arc::clone(&self.ctx),
                    scheduled,
                ));
            }

            if tasks.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    status = RunStatus::Interrupted;
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(outcome)) => self.handle_outcome(outcome),
                    Some(Err(e)) => {
                        self.report.fetch_failures += 1;
                        tracing::error!("Fetch task failed: {}", e);
                    }
                    None => {}
                },
            }
        }

        if status == RunStatus::Interrupted {
            let dropped = self.scheduler.clear();
            tracing::warn!(
                "Interrupted: aborting {} in-flight fetches, dropping {} pending requests",
                tasks.len(),
                dropped
            );
            tasks.shutdown().await;
        }

        self.report.status = status;
        self.finalize_sinks(status);

        tracing::info!(
            "Crawl {}: {} listing pages, {} detail pages, {} records, {} fetch failures in {:?}",
            status,
            self.report.listing_pages,
            self.report.detail_pages,
            self.report.records_emitted,
            self.report.fetch_failures,
            start_time.elapsed()
        );

        Ok(self.report)
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        let TaskOutcome { request, result } = outcome;

        match result {
            Err(reason) => {
                self.report.fetch_failures += 1;
                tracing::warn!(
                    "Dropping {} page {}: {}",
                    request.kind,
                    request.url,
                    reason
                );
            }
            Ok(PageOutcome::Listing {
                details,
                next_page,
                offsite,
            }) => {
                self.report.listing_pages += 1;
                self.report.offsite_links += offsite as u64;

                let walked = match self.report.pages_per_seed.get_mut(request.seed) {
                    Some(walked) => {
                        *walked += 1;
                        *walked
                    }
                    None => 0,
                };
                tracing::info!(
                    "Listing page {} (seed {}, page {}): {} detail links, {}",
                    request.url,
                    request.seed,
                    walked,
                    details.len(),
                    if next_page.is_some() {
                        "more pages"
                    } else {
                        "last page"
                    }
                );

                for detail in details {
                    self.scheduler.add_to_frontier(detail);
                }
                if let Some(next) = next_page {
                    self.scheduler.add_to_frontier(next);
                }
            }
            Ok(PageOutcome::Detail { record }) => {
                self.report.detail_pages += 1;
                tracing::debug!("Extracted {} from {}", record.listing_id, request.url);
                self.emit(&record);
            }
        }
    }

    fn emit(&mut self, record: &ListingRecord) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.record_listing(record) {
                self.report.sink_failures += 1;
                tracing::error!(
                    "{} sink rejected record {}: {}",
                    sink.name(),
                    record.url,
                    e
                );
            }
        }

        self.report.records_emitted += 1;
        if self.report.records_emitted % 50 == 0 {
            tracing::info!(
                "Progress: {} records, {} requests pending",
                self.report.records_emitted,
                self.scheduler.frontier_size()
            );
        }
    }

    fn finalize_sinks(&mut self, status: RunStatus) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.finalize(status) {
                self.report.sink_failures += 1;
                tracing::error!("Failed to finalize {} sink: {}", sink.name(), e);
            }
        }
    }
}

/// Fetches one page and applies its transition
///
/// The parsed document lives only inside the synchronous `transition` call.
async fn fetch_page(client: Client, ctx: Arc<RunContext>, scheduled: ScheduledFetch) -> TaskOutcome {
    let ScheduledFetch {
        request,
        permit: _permit,
    } = scheduled;

    let result = match fetch_url(&client, &request.url).await {
        FetchResult::Success {
            final_url, body, ..
        } => Ok(transition(&request, &final_url, &body, &ctx)),
        failure => Err(failure.describe()),
    };

    TaskOutcome { request, result }
}
