//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sewa_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sewa.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, SiteConfig, UserAgentConfig,
    DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{
    config_hash, load_config, load_config_or_default, load_config_with_hash, parse_config,
};
