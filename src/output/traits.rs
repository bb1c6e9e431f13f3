//! Record sink trait and error types

use crate::listing::ListingRecord;
use crate::storage::{RunStatus, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for canonical listing records
///
/// The coordinator owns its sinks and calls them from a single task, in
/// record completion order. A failed `record_listing` is logged and counted
/// by the caller; the run continues.
pub trait RecordSink: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Accepts one normalized record
    ///
    /// # Arguments
    ///
    /// * `record` - The record to persist
    fn record_listing(&mut self, record: &ListingRecord) -> OutputResult<()>;

    /// Flushes and closes the sink
    ///
    /// # Arguments
    ///
    /// * `status` - The final status of the crawl run
    fn finalize(&mut self, status: RunStatus) -> OutputResult<()>;
}
