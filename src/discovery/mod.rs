//! Video link discovery.
//!
//! Parses the homepage markup, keeps anchors whose `href` points at a video
//! page and canonicalizes them into [`Link`]s: absolute, `https`, without query
//! string or fragment. Links are deduplicated within one page and keep the
//! order in which they first appear.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::VIDEO_PATH_MARKER;
use crate::error_handling::{ErrorType, ProcessingStats, RetryExhausted};
use crate::fetch::{retry_get, PageFetcher, RetryPolicy};
use crate::utils::parse_selector_with_fallback;

static ANCHOR_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "link discovery"));

/// Canonical absolute URL of one video page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Link(String);

impl Link {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves `href` against the origin of `base` and canonicalizes the result.
///
/// Relative hrefs are taken from the site root, not from `base`'s path, so a
/// homepage configured below the root still yields `/video/...` links.
///
/// Returns `None` when the href does not parse, is not an http(s) URL, or no
/// longer points at a video page once resolved.
pub fn canonicalize_link(base: &Url, href: &str) -> Option<Link> {
    let origin = base.join("/").ok()?;
    let mut url = origin.join(href.trim()).ok()?;

    match url.scheme() {
        "http" => url.set_scheme("https").ok()?,
        "https" => {}
        _ => return None,
    }
    url.set_query(None);
    url.set_fragment(None);

    if !url.path().contains(VIDEO_PATH_MARKER) {
        return None;
    }
    Some(Link(url.into()))
}

/// Extracts canonical video links from a homepage body.
///
/// Malformed markup never fails: whatever `html5ever` recovers is searched, and
/// a page without video anchors yields an empty list.
pub fn discover_links(body: &str, base: &Url) -> Vec<Link> {
    let Some(selector) = ANCHOR_SELECTOR.as_ref() else {
        return Vec::new();
    };

    let document = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in document
        .select(selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.contains(VIDEO_PATH_MARKER))
    {
        match canonicalize_link(base, href) {
            Some(link) => {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            None => log::trace!("Skipping unusable video href '{}'", href),
        }
    }

    log::debug!("Discovered {} unique video links", links.len());
    links
}

/// Fetches the homepage (with retries) and discovers its video links.
pub struct HomepageCrawler {
    fetcher: Arc<dyn PageFetcher>,
    homepage: Url,
    retry: RetryPolicy,
    stats: Arc<ProcessingStats>,
}

impl HomepageCrawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        homepage: Url,
        retry: RetryPolicy,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            fetcher,
            homepage,
            retry,
            stats,
        }
    }

    pub fn homepage(&self) -> &Url {
        &self.homepage
    }

    /// # Errors
    ///
    /// Returns `RetryExhausted` if the homepage could not be fetched. An empty
    /// list is a successful outcome: the portal may only render links with
    /// JavaScript.
    pub async fn discover(&self) -> Result<Vec<Link>, RetryExhausted> {
        let body = retry_get(
            self.fetcher.as_ref(),
            self.homepage.as_str(),
            &self.retry,
            &self.stats,
        )
        .await
        .inspect_err(|_| self.stats.increment_error(ErrorType::HomepageFailed))?;

        log::debug!(
            "Homepage {} returned {} bytes",
            self.homepage,
            body.len()
        );
        Ok(discover_links(&String::from_utf8_lossy(&body), &self.homepage))
    }
}
