//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::listing::ListingRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::SewaError;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const LISTING_COLUMNS: &str = "listing_id, title, url, price, location, property_type, \
     bedrooms, bathrooms, area, furnished, description, images, seller_name, fetched_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SewaError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SewaError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SewaError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params![run_id], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::parse(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ListingRecord> {
    Ok(ListingRecord {
        listing_id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        price: row.get(3)?,
        location: row.get(4)?,
        property_type: row.get(5)?,
        bedrooms: row.get(6)?,
        bathrooms: row.get(7)?,
        area: row.get(8)?,
        furnished: row.get(9)?,
        description: row.get(10)?,
        images: row.get(11)?,
        seller_name: row.get(12)?,
        fetched_at: row.get(13)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, started_at: &str) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![started_at, config_hash, RunStatus::Running.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Listings =====

    fn insert_listing(&mut self, run_id: i64, record: &ListingRecord) -> StorageResult<i64> {
        self.conn.execute(
            &format!(
                "INSERT INTO listings (run_id, {}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                LISTING_COLUMNS
            ),
            params![
                run_id,
                record.listing_id,
                record.title,
                record.url,
                record.price,
                record.location,
                record.property_type,
                record.bedrooms,
                record.bathrooms,
                record.area,
                record.furnished,
                record.description,
                record.images,
                record.seller_name,
                record.fetched_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn listings_for_run(&self, run_id: i64) -> StorageResult<Vec<ListingRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM listings WHERE run_id = ?1 ORDER BY id",
            LISTING_COLUMNS
        ))?;

        let listings = stmt
            .query_map(params![run_id], listing_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    // ===== Statistics =====

    fn count_listings(&self, run_id: i64) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM listings WHERE run_id = ?1", run_id)
    }

    fn count_by_property_type(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT property_type, COUNT(*) AS n FROM listings WHERE run_id = ?1 \
             GROUP BY property_type ORDER BY n DESC, property_type",
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn count_by_bedrooms(&self, run_id: i64) -> StorageResult<Vec<(u32, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT bedrooms, COUNT(*) FROM listings WHERE run_id = ?1 \
             GROUP BY bedrooms ORDER BY bedrooms",
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn count_incomplete(&self, run_id: i64) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM listings WHERE run_id = ?1 AND (listing_id = '' OR price = '')",
            run_id,
        )
    }

    fn count_duplicate_ids(&self, run_id: i64) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) - COUNT(DISTINCT listing_id) FROM listings \
             WHERE run_id = ?1 AND listing_id != ''",
            run_id,
        )
    }
}
