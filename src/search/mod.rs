//! Search parameter resolution
//!
//! Turns the user's region and property-type arguments into the seed URLs of
//! a crawl. All validation happens here, before any network activity, and
//! every invalid value is reported at once.
//!
//! # Example
//!
//! ```
//! use sewa_crawler::search::build_start_urls;
//! use url::Url;
//!
//! let base = Url::parse("https://www.fazwaz.my").unwrap();
//! let seeds = build_start_urls(&base, Some("penang,johor"), Some("condo")).unwrap();
//! assert_eq!(seeds[0].as_str(), "https://www.fazwaz.my/condo-for-rent/malaysia/penang");
//! assert_eq!(seeds[1].as_str(), "https://www.fazwaz.my/condo-for-rent/malaysia/johor");
//! ```

mod property_type;
mod region;
mod slug;

pub use property_type::{
    normalize_property_type, validate_property_type, ALLOWED_PROPERTY_TYPES,
    DEFAULT_PROPERTY_TYPE,
};
pub use region::{
    normalize_regions, sorted_allowed_regions, validate_regions, ALLOWED_REGIONS, DEFAULT_REGION,
};
pub use slug::{slugify, slugify_region_path};

use crate::config::SearchConfig;
use crate::ValidationError;
use url::Url;

/// Raw search arguments as supplied by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Comma-separated region slugs or nested region paths
    pub region: Option<String>,

    /// Free-form property type
    pub property_type: Option<String>,
}

impl SearchParams {
    pub fn new(region: Option<String>, property_type: Option<String>) -> Self {
        Self {
            region,
            property_type,
        }
    }

    /// Command-line values win over the `[search]` section
    pub fn merged(cli: SearchParams, config: &SearchConfig) -> Self {
        Self {
            region: cli.region.or_else(|| config.region.clone()),
            property_type: cli.property_type.or_else(|| config.property_type.clone()),
        }
    }

    /// Builds the seed URLs for these parameters
    pub fn seed_urls(&self, base: &Url) -> Result<Vec<Url>, ValidationError> {
        build_start_urls(base, self.region.as_deref(), self.property_type.as_deref())
    }
}

/// Builds the listing-index seed URLs for a crawl
///
/// The property type is resolved first so an invalid type fails before any
/// region is looked at. Without regions a single URL for [`DEFAULT_REGION`]
/// is returned; the result is never empty.
///
/// URL shape: `base/<type>-for-rent/malaysia[/<region-path>]`.
pub fn build_start_urls(
    base: &Url,
    region: Option<&str>,
    property_type: Option<&str>,
) -> Result<Vec<Url>, ValidationError> {
    let pt = normalize_property_type(property_type);
    validate_property_type(&pt)?;

    let regions = normalize_regions(region);
    let (ok, invalid) = validate_regions(&regions);
    if !ok {
        return Err(ValidationError::Regions {
            invalid,
            allowed: sorted_allowed_regions(),
        });
    }

    let type_segment = format!("{}-for-rent", pt);

    if regions.is_empty() {
        return Ok(vec![seed_url(base, &type_segment, DEFAULT_REGION)?]);
    }

    regions
        .iter()
        .map(|region| seed_url(base, &type_segment, region))
        .collect()
}

fn seed_url(base: &Url, type_segment: &str, region: &str) -> Result<Url, ValidationError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ValidationError::BaseUrl {
                value: base.to_string(),
            })?;
        segments.pop_if_empty().push(type_segment).push("malaysia");
        segments.extend(region.split('/'));
    }

    Ok(url)
}
