//! Sewa crawler main entry point
//!
//! This is the command-line interface for the rental listing harvester.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use sewa_crawler::config::{load_config_or_default, Config};
use sewa_crawler::crawler::{run_crawl, CrawlReport};
use sewa_crawler::search::SearchParams;
use sewa_crawler::storage::RunStatus;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Sewa: a rental listing harvester
///
/// Walks the rental listing pages of a property portal for the requested
/// regions and property type, extracts every listing into a flat record and
/// writes the records to a CSV feed (and optionally SQLite).
#[derive(Parser, Debug)]
#[command(name = "sewa-crawler")]
#[command(version)]
#[command(about = "A rental listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated regions, e.g. "penang,kuala-lumpur/mont-kiara"
    #[arg(long, value_name = "CSV")]
    region: Option<String>,

    /// Property type, e.g. "condo" (a "-for-rent" suffix is accepted)
    #[arg(long, value_name = "TYPE")]
    property_type: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the seed URLs without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show listing statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_config_or_default(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid built-in configuration".to_string(),
        })?;
    match &cli.config {
        Some(path) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            config_hash
        ),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let params = SearchParams::merged(
        SearchParams::new(cli.region, cli.property_type),
        &config.search,
    );

    if cli.dry_run {
        handle_dry_run(&config, &params)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, &params, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sewa_crawler=info,warn"),
            1 => EnvFilter::new("sewa_crawler=debug,info"),
            2 => EnvFilter::new("sewa_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(config: &Config, params: &SearchParams) -> Result<()> {
    let base_url = Url::parse(&config.site.base_url)?;
    let seeds = params.seed_urls(&base_url)?;

    println!("=== Sewa Crawler Dry Run ===\n");

    println!("Site: {}", config.site.base_url);

    println!("\nSearch:");
    println!("  Region: {}", params.region.as_deref().unwrap_or("(default)"));
    println!(
        "  Property type: {}",
        params.property_type.as_deref().unwrap_or("(default)")
    );

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Download delay: {}ms", config.crawler.download_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!(
        "  Database: {}",
        config.output.database_path.as_deref().unwrap_or("(disabled)")
    );

    println!("\nSeed URLs ({}):", seeds.len());
    for seed in &seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    use sewa_crawler::output::{load_statistics, print_statistics};
    use sewa_crawler::storage::open_storage;

    let Some(database_path) = &config.output.database_path else {
        bail!("--stats needs [output] database-path in the configuration");
    };

    println!("Database: {}\n", database_path);

    let storage = open_storage(Path::new(database_path))?;

    match load_statistics(&storage)? {
        Some(stats) => print_statistics(&stats),
        None => println!("No runs recorded yet."),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, params: &SearchParams, config_hash: &str) -> Result<()> {
    let report = run_crawl(config, params, config_hash).await?;
    print_report(&report);

    if report.status == RunStatus::Interrupted {
        tracing::warn!("Crawl was interrupted; output holds a partial run");
    }

    Ok(())
}

fn print_report(report: &CrawlReport) {
    if report.fetch_failures > 0 || report.sink_failures > 0 {
        tracing::warn!(
            "{} fetch failures, {} sink failures",
            report.fetch_failures,
            report.sink_failures
        );
    }
    if report.offsite_links > 0 {
        tracing::info!("{} offsite links skipped", report.offsite_links);
    }
}
