//! Tag extraction from video pages.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::config::{MAX_TAG_CHARS, TAG_CLASS_MARKER};
use crate::utils::{attribute_contains_selector, parse_selector_with_fallback};

/// Strategy for pulling tag strings out of a video page.
pub trait TagExtractor: Send + Sync {
    /// Returns the page's tags in first-seen order, each at most once.
    fn extract(&self, body: &str) -> Vec<String>;
}

/// Reads the text of anchors whose `class` attribute contains a marker substring.
#[derive(Debug, Clone)]
pub struct ClassMarkerExtractor {
    marker: String,
    selector: Option<Selector>,
}

impl ClassMarkerExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let selector = parse_selector_with_fallback(
            &attribute_contains_selector("a", "class", &marker),
            "tag extraction",
        );
        Self { marker, selector }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for ClassMarkerExtractor {
    fn default() -> Self {
        Self::new(TAG_CLASS_MARKER)
    }
}

impl TagExtractor for ClassMarkerExtractor {
    fn extract(&self, body: &str) -> Vec<String> {
        let Some(selector) = self.selector.as_ref() else {
            return Vec::new();
        };

        let document = Html::parse_document(body);
        let mut seen = HashSet::new();
        let mut tags = Vec::new();

        for anchor in document.select(selector) {
            let text = anchor.text().collect::<String>();
            let tag = text.trim();
            if !is_valid_tag(tag) {
                continue;
            }
            if seen.insert(tag.to_string()) {
                tags.push(tag.to_string());
            }
        }

        tags
    }
}

/// Non-empty and shorter than `MAX_TAG_CHARS` characters.
fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().count() < MAX_TAG_CHARS
}

/// Extracts tags with the default `class*="tag"` strategy.
pub fn extract_tags(body: &str) -> Vec<String> {
    ClassMarkerExtractor::default().extract(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tags_basic() {
        let body = r#"
            <div class="tag-panel">
                <a class="tag-link" href="/t/1"> 游戏 </a>
                <a class="video-tag" href="/t/2"><span>Review</span></a>
                <a class="up-name" href="/space/1">not a tag</a>
            </div>
        "#;
        assert_eq!(extract_tags(body), vec!["游戏", "Review"]);
    }

    #[test]
    fn test_extract_tags_skips_blank_and_long_text() {
        let body = format!(
            r#"<a class="tag"></a><a class="tag">   </a><a class="tag">{}</a><a class="tag">{}</a>"#,
            "x".repeat(20),
            "y".repeat(19),
        );
        assert_eq!(extract_tags(&body), vec!["y".repeat(19)]);
    }

    #[test]
    fn test_extract_tags_measures_characters_not_bytes() {
        // 11 CJK characters are 33 bytes but under the limit
        let tag = "哔哩哔哩动画游戏音乐舞";
        let body = format!(r#"<a class="tag">{tag}</a>"#);
        assert_eq!(extract_tags(&body), vec![tag]);
    }

    #[test]
    fn test_extract_tags_dedups_within_page() {
        let body = r#"<a class="tag">game</a><a class="tag-item">game</a><a class="tag">music</a>"#;
        assert_eq!(extract_tags(body), vec!["game", "music"]);
    }

    #[test]
    fn test_extract_tags_ignores_non_anchor_elements() {
        let body = r#"<span class="tag">game</span><div class="tag">music</div>"#;
        assert!(extract_tags(body).is_empty());
    }

    #[test]
    fn test_extract_tags_garbage_input() {
        assert!(extract_tags("").is_empty());
        assert!(extract_tags("<<<a class='tag'").is_empty());
    }

    #[test]
    fn test_custom_marker() {
        let extractor = ClassMarkerExtractor::new("topic");
        assert_eq!(extractor.marker(), "topic");
        let body = r#"<a class="tag">game</a><a class="topic-link">anime</a>"#;
        assert_eq!(extractor.extract(body), vec!["anime"]);
    }
}
