//! In-memory record sink
//!
//! Collects records into a shared vector. Useful when embedding the crawler
//! as a library and in tests.

use crate::listing::ListingRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::storage::RunStatus;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Collected {
    records: Vec<ListingRecord>,
    status: Option<RunStatus>,
}

/// Sink that keeps every record in memory
///
/// Clones share the same buffer, so a clone kept by the caller can read what
/// the coordinator's copy received.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Collected>>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in arrival order
    pub fn records(&self) -> Vec<ListingRecord> {
        self.inner
            .lock()
            .map(|collected| collected.records.clone())
            .unwrap_or_default()
    }

    /// The status the sink was finalized with, if any
    pub fn final_status(&self) -> Option<RunStatus> {
        self.inner.lock().ok().and_then(|collected| collected.status)
    }
}

impl RecordSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn record_listing(&mut self, record: &ListingRecord) -> OutputResult<()> {
        let mut collected = self
            .inner
            .lock()
            .map_err(|e| OutputError::Write(format!("Failed to lock buffer: {}", e)))?;
        collected.records.push(record.clone());
        Ok(())
    }

    fn finalize(&mut self, status: RunStatus) -> OutputResult<()> {
        let mut collected = self
            .inner
            .lock()
            .map_err(|e| OutputError::Write(format!("Failed to lock buffer: {}", e)))?;
        collected.status = Some(status);
        Ok(())
    }
}
