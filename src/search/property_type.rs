use crate::search::slug::slugify;
use crate::ValidationError;

/// Property types the portal publishes a rental index for
pub const ALLOWED_PROPERTY_TYPES: [&str; 7] = [
    "property",
    "condo",
    "apartment",
    "house",
    "townhouse",
    "villa",
    "penthouse",
];

/// Type used when the caller does not name one
pub const DEFAULT_PROPERTY_TYPE: &str = "penthouse";

const FOR_RENT_SUFFIX: &str = "-for-rent";

/// Normalizes a free-form property type into its slug
///
/// Absent or empty input yields [`DEFAULT_PROPERTY_TYPE`]. Any other input
/// is slugged as given, so whitespace alone becomes an empty slug that
/// [`validate_property_type`] rejects. A trailing
/// `-for-rent` is accepted and removed, so the value can be pasted straight
/// from a portal URL.
///
/// ```
/// use sewa_crawler::search::normalize_property_type;
///
/// assert_eq!(normalize_property_type(Some("Condo-For-Rent")), "condo");
/// assert_eq!(normalize_property_type(None), "penthouse");
/// ```
pub fn normalize_property_type(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return DEFAULT_PROPERTY_TYPE.to_string(),
    };

    let slug = slugify(raw);
    match slug.strip_suffix(FOR_RENT_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => slug,
    }
}

/// Checks a normalized slug against [`ALLOWED_PROPERTY_TYPES`]
pub fn validate_property_type(slug: &str) -> Result<(), ValidationError> {
    if ALLOWED_PROPERTY_TYPES.contains(&slug) {
        return Ok(());
    }

    Err(ValidationError::PropertyType {
        value: slug.to_string(),
        allowed: sorted_allowed_types(),
    })
}

fn sorted_allowed_types() -> Vec<String> {
    let mut allowed: Vec<String> = ALLOWED_PROPERTY_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect();
    allowed.sort();
    allowed
}
