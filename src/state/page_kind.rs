/// Page kind definitions for the two-phase traversal
///
/// Every pending fetch carries the kind of page it expects, and the
/// coordinator dispatches on it once the body arrives.
use std::fmt;
use url::Url;

/// The kind of page a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A listing index page: yields detail links and maybe a next page
    Listing,

    /// A single property page: yields exactly one record
    Detail,
}

impl PageKind {
    /// Converts to a string for logs and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pending fetch owned by the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Absolute URL to fetch
    pub url: Url,

    /// What the page is expected to be
    pub kind: PageKind,

    /// Index of the seed this request descends from
    pub seed: usize,
}

impl CrawlRequest {
    /// A listing request
    pub fn listing(url: Url, seed: usize) -> Self {
        Self {
            url,
            kind: PageKind::Listing,
            seed,
        }
    }

    /// A detail request
    pub fn detail(url: Url, seed: usize) -> Self {
        Self {
            url,
            kind: PageKind::Detail,
            seed,
        }
    }
}
