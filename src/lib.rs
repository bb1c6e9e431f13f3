//! Sewa: a rental listing harvester
//!
//! This crate crawls the rental section of a property portal, walking listing
//! index pages and their pagination, extracting every detail page into a flat
//! [`ListingRecord`] and handing the records to one or more output sinks.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod search;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum SewaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid search parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Rejected region or property-type input
///
/// Both variants carry the complete allowed set so the caller can print a
/// single actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid property_type='{value}'. Allowed: {allowed:?}")]
    PropertyType { value: String, allowed: Vec<String> },

    #[error(
        "Invalid region value(s): {invalid:?}. Allowed top-level regions: {allowed:?}; \
         nested paths like 'penang/barat-daya-southwest-penang' are supported."
    )]
    Regions {
        invalid: Vec<String>,
        allowed: Vec<String>,
    },

    #[error("Base URL '{value}' cannot be a base for path segments")]
    BaseUrl { value: String },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, SewaError>;

// Re-export commonly used types
pub use config::Config;
pub use listing::{ExtractedListing, ListingRecord};
pub use normalize::Normalize;
pub use search::{build_start_urls, SearchParams};
pub use state::{CrawlRequest, PageKind, RunContext};
