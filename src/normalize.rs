//! Post-extraction normalization
//!
//! One pure pass that makes a record storage-ready: the image list is
//! flattened into a single delimited string and the optional area becomes an
//! empty string when it was not found. Applying the pass to a record that has
//! already been normalized returns it unchanged.

use crate::listing::{ExtractedListing, ListingRecord, IMAGE_DELIMITER};

/// Conversion into the canonical record
pub trait Normalize {
    fn normalize(self) -> ListingRecord;
}

impl Normalize for ExtractedListing {
    fn normalize(self) -> ListingRecord {
        ListingRecord {
            listing_id: self.listing_id,
            title: self.title,
            url: self.url,
            price: self.price,
            location: self.location,
            property_type: self.property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area.unwrap_or_default(),
            furnished: self.furnished,
            description: self.description,
            images: join_images(self.images.iter().map(String::as_str)),
            seller_name: self.seller_name,
            fetched_at: self.fetched_at,
        }
    }
}

impl Normalize for ListingRecord {
    fn normalize(self) -> ListingRecord {
        let images = join_images(self.image_urls());
        ListingRecord { images, ..self }
    }
}

/// Joins the non-empty entries with [`IMAGE_DELIMITER`]
pub fn join_images<'a>(images: impl IntoIterator<Item = &'a str>) -> String {
    images
        .into_iter()
        .filter(|img| !img.trim().is_empty())
        .collect::<Vec<_>>()
        .join(IMAGE_DELIMITER)
}
