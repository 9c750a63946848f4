//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector, logging instead of failing.
///
/// Callers treat `None` as "matches nothing", so a bad selector degrades
/// extraction to an empty result instead of aborting a crawl.
///
/// # Arguments
///
/// * `selector_str` - The CSS selector string to parse
/// * `context` - Context description for error logging (e.g., "tag extraction")
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!(
                "Failed to parse CSS selector '{}' in {}: {}. Matching nothing.",
                selector_str,
                context,
                e
            );
            None
        }
    }
}

/// Builds an attribute-substring selector such as `a[class*='tag']`.
///
/// Single quotes and backslashes in `needle` are escaped so user-supplied
/// markers cannot break out of the attribute value.
pub fn attribute_contains_selector(element: &str, attribute: &str, needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{element}[{attribute}*='{escaped}']")
}
