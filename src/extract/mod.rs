//! Field extraction for listing detail pages
//!
//! Each output field has its own extractor. Extractors never fail: a field
//! whose markup cannot be found takes its default (zero for room counts,
//! empty string or empty list otherwise) and the record is still produced.

mod fields;
mod text;

pub use fields::{
    basic_info, basic_info_alt, block_text, image_sources, location, room_count, text_of,
};
pub use text::{clean_comma_ws, clean_ws, first_number, normalize_space};

use crate::listing::ExtractedListing;
use crate::state::RunContext;
use scraper::Html;
use url::Url;

const LISTING_ID: &str = "strong[class*=unit-id]";
const TITLE: &str = "h1[class*=unit-name]";
const PRICE: &str = "div[class*=rent-price__price]";
const DESCRIPTION: &str = "div.unit-view-description";
const GALLERY: &str = "div#gallery-detail-page-version-4";

/// Extracts one listing from a detail page body
///
/// `page_url` is the URL the body was fetched from; it becomes the record's
/// `url` and is the base for resolving image sources.
pub fn extract_listing(html: &str, page_url: &Url, ctx: &RunContext) -> ExtractedListing {
    let document = Html::parse_document(html);
    extract_from_document(&document, page_url, ctx)
}

/// Extracts one listing from an already parsed detail page
pub fn extract_from_document(
    document: &Html,
    page_url: &Url,
    ctx: &RunContext,
) -> ExtractedListing {
    ExtractedListing {
        listing_id: text_of(document, LISTING_ID),
        title: text_of(document, TITLE),
        url: page_url.to_string(),
        price: text_of(document, PRICE),
        location: location(document),
        property_type: basic_info(document, "Property Type"),
        bedrooms: room_count(document, "Bedroom"),
        bathrooms: room_count(document, "Bathroom"),
        area: area(document),
        furnished: first_present([
            basic_info_alt(document, "Furniture"),
            basic_info(document, "Furniture"),
        ])
        .unwrap_or_default(),
        description: block_text(document, DESCRIPTION),
        images: image_sources(document, GALLERY, page_url),
        seller_name: first_present([
            basic_info_alt(document, "Listed By"),
            basic_info(document, "Listed By"),
        ])
        .unwrap_or_default(),
        fetched_at: ctx.fetched_at().to_string(),
    }
}

/// Unit size, falling back to plot size for landed property
fn area(document: &Html) -> Option<String> {
    first_present([basic_info(document, "Size"), basic_info(document, "Plot Size")])
}

fn first_present<const N: usize>(candidates: [String; N]) -> Option<String> {
    candidates.into_iter().find(|value| !value.is_empty())
}
