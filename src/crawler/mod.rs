//! Crawler module for listing traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Listing page link discovery and pagination
//! - The listing/detail page transitions
//! - Request scheduling and politeness
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod transition;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{parse_listing_page, ListingPage};
pub use scheduler::{ScheduledFetch, Scheduler};
pub use transition::{transition, PageOutcome};

use crate::config::Config;
use crate::output::open_sinks;
use crate::search::SearchParams;
use crate::state::RunContext;
use url::Url;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the seed URLs from the search parameters
/// 2. Fix the run timestamp and allowed hosts
/// 3. Open the configured sinks
/// 4. Walk every seed's listing chain and its detail pages
/// 5. Stop early on Ctrl-C, finalizing the sinks as interrupted
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `params` - Region and property type to search
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Example
///
/// ```no_run
/// use sewa_crawler::config::Config;
/// use sewa_crawler::crawler::run_crawl;
/// use sewa_crawler::search::SearchParams;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = SearchParams::new(Some("penang,selangor".into()), Some("condo".into()));
/// let report = run_crawl(&Config::default(), &params, "").await?;
/// println!("{} records", report.records_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    params: &SearchParams,
    config_hash: &str,
) -> crate::Result<CrawlReport> {
    let base_url = Url::parse(&config.site.base_url)?;
    let seeds = params.seed_urls(&base_url)?;
    for seed in &seeds {
        tracing::info!("Seed: {}", seed);
    }

    let ctx = RunContext::new(&base_url);
    let sinks = open_sinks(&config.output, config_hash, ctx.fetched_at())?;

    let coordinator = Coordinator::new(config, ctx, seeds, sinks)?;
    coordinator.run_until(ctrl_c()).await
}

/// Completes on the first Ctrl-C; never completes if the handler cannot be installed
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::warn!("Received Ctrl-C, stopping crawl"),
        Err(e) => {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
