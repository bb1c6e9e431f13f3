//! Statistics from the listing database
//!
//! This module provides functionality for extracting and displaying
//! per-run listing statistics from the storage layer.

use crate::storage::{RunRecord, Storage};
use crate::SewaError;

/// Listing statistics for one run
#[derive(Debug, Clone)]
pub struct ListingStatistics {
    /// The run the figures belong to
    pub run: RunRecord,

    /// Total records emitted by the run
    pub total_listings: u64,

    /// Record counts by property type, most common first
    pub by_property_type: Vec<(String, u64)>,

    /// Record counts by bedroom count, ascending
    pub by_bedrooms: Vec<(u32, u64)>,

    /// Records missing a listing id or price
    pub incomplete: u64,

    /// Repeated listing ids within the run
    pub duplicate_ids: u64,
}

/// Loads statistics for the most recent run
///
/// # Returns
///
/// * `Ok(Some(ListingStatistics))` - Statistics of the latest run
/// * `Ok(None)` - The database has no runs yet
/// * `Err(SewaError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<Option<ListingStatistics>, SewaError> {
    let Some(run) = storage.get_latest_run()? else {
        return Ok(None);
    };

    Ok(Some(ListingStatistics {
        total_listings: storage.count_listings(run.id)?,
        by_property_type: storage.count_by_property_type(run.id)?,
        by_bedrooms: storage.count_by_bedrooms(run.id)?,
        incomplete: storage.count_incomplete(run.id)?,
        duplicate_ids: storage.count_duplicate_ids(run.id)?,
        run,
    }))
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ListingStatistics) {
    println!("=== Listing Statistics ===\n");

    println!("Run {}:", stats.run.id);
    println!("  Status: {}", stats.run.status);
    println!("  Started: {}", stats.run.started_at);
    if let Some(finished) = &stats.run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!("  Config hash: {}", stats.run.config_hash);
    println!();

    println!("Overview:");
    println!("  Total listings: {}", stats.total_listings);
    println!("  Incomplete (no id or price): {}", stats.incomplete);
    println!("  Repeated listing ids: {}", stats.duplicate_ids);
    println!();

    if !stats.by_property_type.is_empty() {
        println!("Listings by Property Type:");
        for (property_type, count) in &stats.by_property_type {
            let label = if property_type.is_empty() {
                "(unknown)"
            } else {
                property_type.as_str()
            };
            println!(
                "  {}: {} ({:.1}%)",
                label,
                count,
                percentage(*count, stats.total_listings)
            );
        }
        println!();
    }

    if !stats.by_bedrooms.is_empty() {
        println!("Listings by Bedrooms:");
        for (bedrooms, count) in &stats.by_bedrooms {
            println!("  {}: {}", bedrooms, count);
        }
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}
