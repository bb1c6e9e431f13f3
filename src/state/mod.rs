//! State module for the crawl
//!
//! # Components
//!
//! - `PageKind`: which phase a page belongs to (listing index or detail)
//! - `CrawlRequest`: a pending fetch tagged with its page kind
//! - `RunContext`: immutable per-run values shared by every fetch task

mod page_kind;
mod run_context;

// Re-export main types
pub use page_kind::{CrawlRequest, PageKind};
pub use run_context::RunContext;
