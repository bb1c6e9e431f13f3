//! Listing index page parser
//!
//! A listing page contributes two things to the frontier:
//! - the detail page links of every result card, in document order
//! - at most one "next page" link continuing the pagination chain

use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

const DETAIL_LINK: &str = "div[data-tk=unit-result] > a[href]";
const NEXT_PAGE_LINK: &str = "a[aria-label=Next][href]";

/// Links discovered on a listing page (absolute URLs)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Detail page links, in document order
    pub detail_links: Vec<Url>,

    /// The pagination continuation, if the page has one
    pub next_page: Option<Url>,
}

/// Parses a listing page body
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the page was fetched from, for resolving relative links
///
/// # Example
///
/// ```
/// use sewa_crawler::crawler::parse_listing_page;
/// use url::Url;
///
/// let html = r#"<div data-tk="unit-result"><a href="/u1">One</a></div>
///               <a aria-label="Next" href="?page=2">Next</a>"#;
/// let page_url = Url::parse("https://www.fazwaz.my/condo-for-rent/malaysia/penang").unwrap();
/// let page = parse_listing_page(html, &page_url);
/// assert_eq!(page.detail_links[0].as_str(), "https://www.fazwaz.my/u1");
/// assert_eq!(
///     page.next_page.unwrap().as_str(),
///     "https://www.fazwaz.my/condo-for-rent/malaysia/penang?page=2"
/// );
/// ```
pub fn parse_listing_page(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        detail_links: extract_detail_links(&document, page_url),
        next_page: extract_next_page(&document, page_url),
    }
}

/// Extracts the detail links of every result card
fn extract_detail_links(document: &Html, page_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse(DETAIL_LINK) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, page_url))
        .collect()
}

/// Extracts the first usable "Next" pagination link
fn extract_next_page(document: &Html, page_url: &Url) -> Option<Url> {
    let selector = Selector::parse(NEXT_PAGE_LINK).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .find_map(|href| resolve_href(href, page_url))
}
