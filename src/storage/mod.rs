//! Storage module for persisting crawl runs and their records
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - Run tracking with terminal status
//! - Append-only listing records
//! - Aggregates for the `--stats` report

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::SewaError;

use std::path::Path;

/// Opens (creating if needed) the SQLite database at `path`
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SewaError> {
    SqliteStorage::new(path)
}

/// One row of the `runs` table
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Lifecycle of a run; every status but `Running` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub const ALL: [RunStatus; 4] = [
        RunStatus::Running,
        RunStatus::Completed,
        RunStatus::Interrupted,
        RunStatus::Failed,
    ];

    /// Lowercase name, as stored in `runs.status`
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Interrupted => "interrupted",
            RunStatus::Failed => "failed",
        }
    }

    pub fn parse(name: &str) -> Option<RunStatus> {
        Self::ALL.into_iter().find(|status| status.as_str() == name)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
