//! Page transitions of the two-phase traversal
//!
//! A fetched page is turned into a [`PageOutcome`] according to the kind of
//! request that fetched it. This is the only place the crawler branches on
//! [`PageKind`].

use crate::crawler::parser::parse_listing_page;
use crate::extract::extract_listing;
use crate::listing::ListingRecord;
use crate::normalize::Normalize;
use crate::state::{CrawlRequest, PageKind, RunContext};
use url::Url;

/// What a fetched page contributes to the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A listing page fans out to detail pages and may continue pagination
    Listing {
        /// One detail request per result card, in document order
        details: Vec<CrawlRequest>,

        /// The next listing page of the same chain
        next_page: Option<CrawlRequest>,

        /// Links dropped because they left the allowed hosts
        offsite: usize,
    },

    /// A detail page yields exactly one normalized record
    Detail {
        record: ListingRecord,
    },
}

/// Applies the transition for `request` to the fetched page
///
/// # Arguments
///
/// * `request` - The request the body was fetched for
/// * `page_url` - The URL the body was served from (after redirects)
/// * `body` - The page HTML
/// * `ctx` - The run context
pub fn transition(
    request: &CrawlRequest,
    page_url: &Url,
    body: &str,
    ctx: &RunContext,
) -> PageOutcome {
    match request.kind {
        PageKind::Listing => {
            let page = parse_listing_page(body, page_url);
            let hosts = ctx.allowed_hosts();
            let mut offsite = 0;

            let mut keep = |url: Url| {
                if hosts.allows(&url) {
                    Some(url)
                } else {
                    tracing::debug!("Dropping offsite link {} found on {}", url, page_url);
                    offsite += 1;
                    None
                }
            };

            let details = page
                .detail_links
                .into_iter()
                .filter_map(&mut keep)
                .map(|url| CrawlRequest::detail(url, request.seed))
                .collect();
            let next_page = page
                .next_page
                .and_then(&mut keep)
                .map(|url| CrawlRequest::listing(url, request.seed));

            PageOutcome::Listing {
                details,
                next_page,
                offsite,
            }
        }
        PageKind::Detail => PageOutcome::Detail {
            record: extract_listing(body, page_url, ctx).normalize(),
        },
    }
}
