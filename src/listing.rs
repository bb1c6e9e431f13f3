//! Listing record types
//!
//! A detail page is first extracted into an [`ExtractedListing`], whose
//! images are still a list and whose area may be missing. The normalization
//! pass turns it into the flat [`ListingRecord`] that output sinks receive.

use serde::{Deserialize, Serialize};

/// A listing as extracted from one detail page
///
/// Textual fields default to the empty string and room counts to zero;
/// `area` is the only field that may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedListing {
    pub listing_id: String,
    pub title: String,
    pub url: String,
    pub price: String,
    pub location: String,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: Option<String>,
    pub furnished: String,
    pub description: String,
    /// Absolute image URLs in document order
    pub images: Vec<String>,
    pub seller_name: String,
    pub fetched_at: String,
}

/// The canonical, storage-ready listing record
///
/// Field order is the column order of the CSV feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub listing_id: String,
    pub title: String,
    pub url: String,
    /// Raw currency string, e.g. `RM 2,500`
    pub price: String,
    pub location: String,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Raw area string, e.g. `1,200 SqFt`
    pub area: String,
    pub furnished: String,
    pub description: String,
    /// Image URLs joined with [`IMAGE_DELIMITER`]
    pub images: String,
    pub seller_name: String,
    /// Run start time, ISO-8601 UTC
    pub fetched_at: String,
}

/// Separator used when flattening the image list
pub const IMAGE_DELIMITER: &str = " | ";

/// Column names of the record feed, in order
pub const RECORD_COLUMNS: [&str; 14] = [
    "listing_id",
    "title",
    "url",
    "price",
    "location",
    "property_type",
    "bedrooms",
    "bathrooms",
    "area",
    "furnished",
    "description",
    "images",
    "seller_name",
    "fetched_at",
];

impl ListingRecord {
    /// Splits the flattened image column back into URLs
    pub fn image_urls(&self) -> Vec<&str> {
        self.images
            .split(IMAGE_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
