//! DOM lookups used by the field extractors
//!
//! Every function here is total: a missing node, an unparsable selector or
//! an unexpected shape yields the field's default instead of an error.

use crate::extract::text::{clean_comma_ws, clean_ws, first_number, normalize_space};
use scraper::{ElementRef, Html, Selector};
use url::Url;

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Text nodes that are direct children of `element`
fn direct_texts<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
}

/// Element siblings after `element` with the given tag name
fn following_siblings<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(move |sibling| sibling.value().name() == name)
}

/// First non-blank direct text of the elements matching `css`, cleaned
pub fn text_of(document: &Html, css: &str) -> String {
    let Some(sel) = selector(css) else {
        return String::new();
    };

    document
        .select(&sel)
        .flat_map(direct_texts)
        .find(|text| !text.trim().is_empty())
        .map(clean_ws)
        .unwrap_or_default()
}

/// Reads the value shown next to a `<span>` label
///
/// Matches every `span` whose first text node, whitespace-normalized, equals
/// `label`, and collects all text from the `span` elements that follow it
/// under the same parent.
///
/// ```
/// use scraper::Html;
/// use sewa_crawler::extract::basic_info;
///
/// let html = Html::parse_document(
///     "<div><span> Property Type </span><span><b>Condo</b></span></div>",
/// );
/// assert_eq!(basic_info(&html, "Property Type"), "Condo");
/// assert_eq!(basic_info(&html, "Furniture"), "");
/// ```
pub fn basic_info(document: &Html, label: &str) -> String {
    let Some(spans) = selector("span") else {
        return String::new();
    };
    let label = normalize_space(label);

    let mut parts: Vec<&str> = Vec::new();
    for span in document.select(&spans) {
        let first_text = span
            .children()
            .find_map(|child| child.value().as_text().map(|text| normalize_space(text)));
        if first_text.as_deref() != Some(label.as_str()) {
            continue;
        }

        for sibling in following_siblings(span, "span") {
            parts.extend(sibling.text());
        }
    }

    clean_ws(&parts.join(" "))
}

/// Reads the value shown next to a `<div>` label
///
/// Some detail layouts put the label as bare text in a `div` with the value
/// in a following `span`; only the span's own text nodes are read.
pub fn basic_info_alt(document: &Html, label: &str) -> String {
    let Some(divs) = selector("div") else {
        return String::new();
    };
    let label = normalize_space(label);

    let mut parts: Vec<&str> = Vec::new();
    for div in document.select(&divs) {
        if !direct_texts(div).any(|text| normalize_space(text) == label) {
            continue;
        }

        for sibling in following_siblings(div, "span") {
            parts.extend(direct_texts(sibling));
        }
    }

    clean_ws(&parts.join(" "))
}

/// Reads a room count such as bedrooms or bathrooms
///
/// Looks for a `div` with a descendant `<small>` whose text contains
/// `room_type`, takes the first non-blank text node sitting directly in such
/// a div (in document order) and parses its first digit run. Anything else
/// is zero.
///
/// ```
/// use scraper::Html;
/// use sewa_crawler::extract::room_count;
///
/// let html = Html::parse_document("<div>3 <small>Bedrooms</small></div>");
/// assert_eq!(room_count(&html, "Bedroom"), 3);
/// assert_eq!(room_count(&html, "Bathroom"), 0);
/// ```
pub fn room_count(document: &Html, room_type: &str) -> u32 {
    let Some(smalls) = selector("small") else {
        return 0;
    };

    let labelled = |div: ElementRef<'_>| {
        div.select(&smalls).any(|small| {
            direct_texts(small)
                .next()
                .map_or(false, |text| text.contains(room_type))
        })
    };

    let raw = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            if text.trim().is_empty() {
                return None;
            }
            let parent = node.parent().and_then(ElementRef::wrap)?;
            (parent.value().name() == "div" && labelled(parent)).then(|| &**text)
        })
        .next();

    raw.map(clean_ws)
        .and_then(|data| first_number(&data))
        .unwrap_or(0)
}

/// Reads the project location line
///
/// The location is usually split across several inline fragments; they are
/// merged, whitespace-cleaned and comma-normalized.
pub fn location(document: &Html) -> String {
    let primary = selector("span[class*=project-location]")
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|span| normalize_space(&span.text().collect::<String>()))
        })
        .unwrap_or_default();

    let data = if primary.is_empty() {
        selector("span.project-location")
            .map(|sel| {
                document
                    .select(&sel)
                    .flat_map(|span| span.text())
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    } else {
        primary
    };

    clean_comma_ws(&clean_ws(&data))
}

/// Full text of the first element matching `css`, cleaned line by line
pub fn block_text(document: &Html, css: &str) -> String {
    selector(css)
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|element| clean_ws(&element.text().collect::<String>()))
        })
        .unwrap_or_default()
}

/// Absolute URLs of the `<img>` sources inside the element matching
/// `gallery_css`, in document order
pub fn image_sources(document: &Html, gallery_css: &str, page_url: &Url) -> Vec<String> {
    let Some(sel) = selector(&format!("{} img[src]", gallery_css)) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|img| img.value().attr("src"))
        .map(clean_ws)
        .filter(|src| !src.is_empty())
        .filter_map(|src| page_url.join(&src).ok())
        .map(String::from)
        .collect()
}
