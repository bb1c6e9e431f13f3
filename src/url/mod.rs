//! URL handling module
//!
//! This module provides host extraction, the per-run allowed-host set, and
//! resolution of the `href`/`src` values found in fetched pages.

mod hosts;

pub use hosts::{extract_domain, AllowedHosts};

use url::Url;

/// Resolves a link `href` against the page it was found on
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - values that do not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sewa_crawler::url::resolve_href;
///
/// let page = Url::parse("https://www.fazwaz.my/condo-for-rent/malaysia/penang").unwrap();
/// let resolved = resolve_href("/property-for-rent/u123", &page).unwrap();
/// assert_eq!(resolved.as_str(), "https://www.fazwaz.my/property-for-rent/u123");
/// assert!(resolve_href("javascript:void(0)", &page).is_none());
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
