use crate::search::slug::slugify_region_path;
use once_cell::sync::Lazy;
use regex::Regex;

/// Top-level regions (states and federal territories)
pub const ALLOWED_REGIONS: [&str; 16] = [
    "johor",
    "kedah",
    "kelantan",
    "melaka",
    "negeri-sembilan",
    "pahang",
    "perak",
    "perlis",
    "penang",
    "sabah",
    "sarawak",
    "selangor",
    "terengganu",
    "kuala-lumpur",
    "putrajaya",
    "labuan",
];

/// Region crawled when none is requested
pub const DEFAULT_REGION: &str = "penang";

static REGION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[-/][a-z0-9]+)*$").unwrap());

/// Splits a comma-separated region argument into region path slugs
///
/// Entries that are blank before slugging are dropped. An entry that slugs
/// down to nothing is kept as an empty path so validation reports it.
/// Entries are kept in input order and are not deduplicated.
///
/// ```
/// use sewa_crawler::search::normalize_regions;
///
/// assert_eq!(
///     normalize_regions(Some("Penang, ,Kuala Lumpur")),
///     vec!["penang".to_string(), "kuala-lumpur".to_string()]
/// );
/// assert!(normalize_regions(None).is_empty());
/// ```
pub fn normalize_regions(csv: Option<&str>) -> Vec<String> {
    let Some(csv) = csv else {
        return Vec::new();
    };

    csv.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(slugify_region_path)
        .collect()
}

/// Validates region paths, collecting every offender
///
/// An entry is valid when its first `/` segment is an allowed top-level
/// region and the whole path matches `segment(-segment)*` per component.
pub fn validate_regions(regions: &[String]) -> (bool, Vec<String>) {
    let invalid: Vec<String> = regions
        .iter()
        .filter(|region| !is_valid_region(region))
        .cloned()
        .collect();

    (invalid.is_empty(), invalid)
}

fn is_valid_region(region: &str) -> bool {
    let top = region.split('/').next().unwrap_or_default();
    ALLOWED_REGIONS.contains(&top) && REGION_PATH.is_match(region)
}

/// The allowed top-level regions, sorted for error messages
pub fn sorted_allowed_regions() -> Vec<String> {
    let mut allowed: Vec<String> = ALLOWED_REGIONS.iter().map(|r| r.to_string()).collect();
    allowed.sort();
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_regions_splits_and_slugifies() {
        assert_eq!(
            normalize_regions(Some("penang,johor")),
            regions(&["penang", "johor"])
        );
        assert_eq!(
            normalize_regions(Some("Penang/Barat Daya,,  ")),
            regions(&["penang/barat-daya"])
        );
    }

    #[test]
    fn test_normalize_regions_empty_input() {
        assert!(normalize_regions(None).is_empty());
        assert!(normalize_regions(Some("")).is_empty());
        assert!(normalize_regions(Some(" , ,")).is_empty());
    }

    #[test]
    fn test_normalize_keeps_entries_that_slug_to_nothing() {
        assert_eq!(
            normalize_regions(Some("johor,@@@, ,???")),
            regions(&["johor", "", ""])
        );
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        assert_eq!(
            validate_regions(&regions(&["penang", ""])),
            (false, regions(&[""]))
        );
    }

    #[test]
    fn test_validate_unknown_region() {
        assert_eq!(
            validate_regions(&regions(&["atlantis"])),
            (false, regions(&["atlantis"]))
        );
    }

    #[test]
    fn test_validate_nested_region() {
        assert_eq!(validate_regions(&regions(&["johor/south"])), (true, vec![]));
        assert_eq!(
            validate_regions(&regions(&["penang/barat-daya-southwest-penang"])),
            (true, vec![])
        );
    }

    #[test]
    fn test_validate_reports_every_offender() {
        let (ok, invalid) =
            validate_regions(&regions(&["atlantis", "penang", "mordor/east", "johor"]));
        assert!(!ok);
        assert_eq!(invalid, regions(&["atlantis", "mordor/east"]));
    }

    #[test]
    fn test_validate_rejects_malformed_path() {
        let (ok, invalid) = validate_regions(&regions(&["penang/", "johor//south", "perak/-x"]));
        assert!(!ok);
        assert_eq!(invalid.len(), 3);
    }

    #[test]
    fn test_validate_empty_list() {
        assert_eq!(validate_regions(&[]), (true, vec![]));
    }

    #[test]
    fn test_sorted_allowed_regions() {
        let allowed = sorted_allowed_regions();
        assert_eq!(allowed.len(), 16);
        assert_eq!(allowed[0], "johor");
        assert_eq!(allowed[15], "terengganu");
    }
}
