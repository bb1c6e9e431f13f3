//! Output module: record sinks and reports
//!
//! This module handles:
//! - The `RecordSink` contract the coordinator emits records through
//! - The CSV feed, the SQLite table and an in-memory collector
//! - Listing statistics for `--stats`

mod csv_output;
mod memory;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use memory::MemorySink;
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, ListingStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::config::OutputConfig;
use crate::storage::SqliteStorage;
use crate::SewaError;
use std::path::Path;

/// Opens every sink the output configuration enables
///
/// The CSV feed is always opened; the SQLite sink only when a database path
/// is configured. Any sink that cannot be opened aborts the run before the
/// first fetch.
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `config_hash` - Hash stored with the SQLite run row
/// * `started_at` - Run timestamp stored with the SQLite run row
pub fn open_sinks(
    config: &OutputConfig,
    config_hash: &str,
    started_at: &str,
) -> Result<Vec<Box<dyn RecordSink>>, SewaError> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    sinks.push(Box::new(CsvSink::create(Path::new(&config.csv_path))?));
    tracing::info!("Writing records to {}", config.csv_path);

    if let Some(database_path) = &config.database_path {
        let storage = SqliteStorage::new(Path::new(database_path))?;
        sinks.push(Box::new(SqliteSink::start(storage, config_hash, started_at)?));
        tracing::info!("Writing records to database {}", database_path);
    }

    Ok(sinks)
}
