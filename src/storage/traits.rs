//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::listing::ListingRecord;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Records are append-only: a run inserts every record it emits, duplicates
/// included, and finishes with a terminal status.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    /// * `started_at` - Run timestamp, shared with the run's records
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, started_at: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run finished with the given status and a finish timestamp
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Listings =====

    /// Appends one record to a run
    fn insert_listing(&mut self, run_id: i64, record: &ListingRecord) -> StorageResult<i64>;

    /// Reads back the records of a run in insertion order
    fn listings_for_run(&self, run_id: i64) -> StorageResult<Vec<ListingRecord>>;

    // ===== Statistics =====

    /// Counts the records of a run
    fn count_listings(&self, run_id: i64) -> StorageResult<u64>;

    /// Record counts per property type, most common first
    fn count_by_property_type(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>>;

    /// Record counts per bedroom count, ascending
    fn count_by_bedrooms(&self, run_id: i64) -> StorageResult<Vec<(u32, u64)>>;

    /// Records with an empty listing id or price
    fn count_incomplete(&self, run_id: i64) -> StorageResult<u64>;

    /// Records whose non-empty listing id was already seen in the same run
    fn count_duplicate_ids(&self, run_id: i64) -> StorageResult<u64>;
}
