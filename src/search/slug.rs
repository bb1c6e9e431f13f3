//! Slug helpers shared by the property-type and region resolvers

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static NON_PATH_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9/]+").unwrap());
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());
static SLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-*/[-/]*").unwrap());

/// Lower-cases `s` and turns every run of non-alphanumerics into one hyphen
///
/// ```
/// use sewa_crawler::search::slugify;
///
/// assert_eq!(slugify("  Condo For Rent! "), "condo-for-rent");
/// assert_eq!(slugify("---"), "");
/// ```
pub fn slugify(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let hyphenated = NON_SLUG.replace_all(&lowered, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Like [`slugify`] but keeps `/` so a sub-region can be addressed as
/// `state/area`
///
/// Backslashes count as `/`. Runs of separators collapse, hyphens touching a
/// slash are dropped, and leading/trailing separators are trimmed.
///
/// ```
/// use sewa_crawler::search::slugify_region_path;
///
/// assert_eq!(
///     slugify_region_path("Penang // Barat Daya (Southwest Penang)"),
///     "penang/barat-daya-southwest-penang"
/// );
/// ```
pub fn slugify_region_path(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('\\', "/");
    let hyphenated = NON_PATH_SLUG.replace_all(&lowered, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    let slashed = SLASH_RUN.replace_all(&collapsed, "/");
    slashed.trim_matches(|c| c == '/' || c == '-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Condo"), "condo");
        assert_eq!(slugify("Condo-For-Rent"), "condo-for-rent");
        assert_eq!(slugify("town  house"), "town-house");
        assert_eq!(slugify("__villa__"), "villa");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_region_path_keeps_nesting() {
        assert_eq!(
            slugify_region_path("penang/barat-daya-southwest-penang"),
            "penang/barat-daya-southwest-penang"
        );
        assert_eq!(slugify_region_path("Kuala Lumpur"), "kuala-lumpur");
    }

    #[test]
    fn test_region_path_collapses_separators() {
        assert_eq!(slugify_region_path("johor//south"), "johor/south");
        assert_eq!(slugify_region_path("johor\\south"), "johor/south");
        assert_eq!(slugify_region_path("/johor/south/"), "johor/south");
        assert_eq!(slugify_region_path("johor / south"), "johor/south");
        assert_eq!(slugify_region_path("johor--bahru"), "johor-bahru");
    }
}
