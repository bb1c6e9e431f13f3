use crate::url::AllowedHosts;
use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// Per-run values fixed before the first fetch
///
/// A `RunContext` is built once and then only read. It is shared between
/// fetch tasks behind an `Arc`, and every record of the run takes its
/// `fetched_at` from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    fetched_at: String,
    allowed_hosts: AllowedHosts,
}

impl RunContext {
    /// Creates a context stamped with the current time
    pub fn new(base_url: &Url) -> Self {
        Self::at(Utc::now(), base_url)
    }

    /// Creates a context stamped with `started_at`
    pub fn at(started_at: DateTime<Utc>, base_url: &Url) -> Self {
        Self {
            fetched_at: started_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            allowed_hosts: AllowedHosts::for_base(base_url),
        }
    }

    /// ISO-8601 UTC timestamp shared by every record of the run
    pub fn fetched_at(&self) -> &str {
        &self.fetched_at
    }

    /// Hosts the crawl may follow links to
    pub fn allowed_hosts(&self) -> &AllowedHosts {
        &self.allowed_hosts
    }
}
