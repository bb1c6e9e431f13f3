//! SQLite record sink
//!
//! Each crawl opens a run row, appends every record under it and closes the
//! run with the final status.

use crate::listing::ListingRecord;
use crate::output::traits::{OutputResult, RecordSink};
use crate::storage::{RunStatus, SqliteStorage, Storage};

/// SQLite-based record sink
pub struct SqliteSink {
    storage: SqliteStorage,
    run_id: i64,
}

impl SqliteSink {
    /// Starts a new run in `storage`
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to use
    /// * `config_hash` - Hash of the configuration the run was started with
    /// * `started_at` - Run timestamp, the same value stamped on every record
    pub fn start(
        mut storage: SqliteStorage,
        config_hash: &str,
        started_at: &str,
    ) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash, started_at)?;
        tracing::info!("Recording listings under run {}", run_id);
        Ok(Self { storage, run_id })
    }

    /// ID of the run this sink writes to
    pub fn run_id(&self) -> i64 {
        self.run_id
    }
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn record_listing(&mut self, record: &ListingRecord) -> OutputResult<()> {
        self.storage.insert_listing(self.run_id, record)?;
        Ok(())
    }

    fn finalize(&mut self, status: RunStatus) -> OutputResult<()> {
        self.storage.finish_run(self.run_id, status)?;
        Ok(())
    }
}
