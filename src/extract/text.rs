//! Text cleanup for extracted fragments

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static COMMA_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Collapses whitespace inside each line and drops the empty lines
///
/// ```
/// use sewa_crawler::extract::clean_ws;
///
/// assert_eq!(clean_ws("  Sea   view\n\n   condo \t unit  "), "Sea view\ncondo unit");
/// ```
pub fn clean_ws(text: &str) -> String {
    text.lines()
        .map(|line| WHITESPACE_RUN.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalizes the spacing around commas to `", "`
///
/// Leading and trailing spaces and commas are removed.
///
/// ```
/// use sewa_crawler::extract::clean_comma_ws;
///
/// assert_eq!(clean_comma_ws("a ,b,  c"), "a, b, c");
/// ```
pub fn clean_comma_ws(text: &str) -> String {
    COMMA_SPACING
        .replace_all(text, ", ")
        .trim_matches(|c| c == ' ' || c == ',')
        .to_string()
}

/// XPath-style `normalize-space`: trim and collapse all whitespace to one space
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the first run of ASCII digits, if any
pub fn first_number(text: &str) -> Option<u32> {
    DIGIT_RUN
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}
