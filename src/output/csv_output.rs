//! CSV record feed
//!
//! Writes one row per record under a fixed header, the tabular file the
//! downstream loader reads. The header is written on creation so an empty
//! run still produces a loadable file.

use crate::listing::{ListingRecord, RECORD_COLUMNS};
use crate::output::traits::{OutputResult, RecordSink};
use crate::storage::RunStatus;
use csv::{Writer, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// CSV file sink
pub struct CsvSink {
    writer: Writer<File>,
    path: PathBuf,
    rows: u64,
}

impl CsvSink {
    /// Creates (or truncates) the feed at `path` and writes the header
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(RECORD_COLUMNS)?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    /// Data rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn record_listing(&mut self, record: &ListingRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn finalize(&mut self, status: RunStatus) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::info!(
            "CSV feed {} closed ({} rows, run {})",
            self.path.display(),
            self.rows,
            status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ListingRecord {
        ListingRecord {
            listing_id: "U1".to_string(),
            title: "Sea, Sun & Sand".to_string(),
            url: "https://www.fazwaz.my/u1".to_string(),
            price: "RM 2,500".to_string(),
            location: "Batu Ferringhi, Penang".to_string(),
            property_type: "Condo".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            description: "Line one\nLine two".to_string(),
            images: "https://a/1.jpg | https://a/2.jpg".to_string(),
            fetched_at: "2024-05-01T00:00:00.000000+00:00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_written_for_empty_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.finalize(RunStatus::Completed).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), RECORD_COLUMNS.join(","));
    }

    #[test]
    fn test_records_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.record_listing(&record()).unwrap();
        sink.record_listing(&record()).unwrap();
        assert_eq!(sink.rows(), 2);
        sink.finalize(RunStatus::Completed).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, RECORD_COLUMNS.to_vec());

        let rows: Vec<ListingRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![record(), record()]);
    }
}
