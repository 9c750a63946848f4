// Shared fake page fetchers for the integration tests.
//
// None of these touch the network: pages are served from memory so the whole
// crawl pipeline can run against canonical https links.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bili_tags::error_handling::FetchError;
use bili_tags::{Config, PageFetcher};

pub const HOMEPAGE: &str = "https://www.bilibili.com/";

/// Video page body with one tag anchor per tag.
#[allow(dead_code)]
pub fn video_page(tags: &[&str]) -> String {
    let anchors: String = tags
        .iter()
        .map(|tag| format!(r#"<a class="tag-link" href="/tag/{tag}">{tag}</a>"#))
        .collect();
    format!("<html><body><div class=\"tag-panel\">{anchors}</div></body></html>")
}

/// Homepage body linking to `/video/<id>` for every id.
#[allow(dead_code)]
pub fn homepage(ids: &[&str]) -> String {
    let anchors: String = ids
        .iter()
        .map(|id| format!(r#"<a href="//www.bilibili.com/video/{id}?spm_id_from=333.1007">v</a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

#[allow(dead_code)]
pub fn video_url(id: &str) -> String {
    format!("https://www.bilibili.com/video/{id}")
}

/// Config tuned for tests: no pauses, a single attempt per request.
#[allow(dead_code)]
pub fn fast_config(output_file: std::path::PathBuf) -> Config {
    Config {
        cookie: "SESSDATA=test".to_string(),
        crawl_interval: Duration::ZERO,
        retry_count: 1,
        retry_delay: Duration::ZERO,
        stagger_step: Duration::ZERO,
        output_file,
        ..Default::default()
    }
}

/// Serves bodies from a map; unknown URLs fail with a transport error.
#[allow(dead_code)]
#[derive(Default)]
pub struct PageMapFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl PageMapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl PageFetcher for PageMapFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.to_string());
        self.pages
            .get(url)
            .map(|body| body.clone().into_bytes())
            .ok_or_else(|| FetchError::TooManyRedirects {
                url: url.to_string(),
                limit: 10,
            })
    }
}

/// Counts how many fetches are in flight at once and when each one started.
#[allow(dead_code)]
pub struct InstrumentedFetcher {
    hold: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: Mutex<Vec<(String, Instant)>>,
}

#[allow(dead_code)]
impl InstrumentedFetcher {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Vec<(String, Instant)> {
        self.started.lock().expect("started lock").clone()
    }
}

#[async_trait]
impl PageFetcher for InstrumentedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.started
            .lock()
            .expect("started lock")
            .push((url.to_string(), Instant::now()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.hold).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(video_page(&["game"]).into_bytes())
    }
}
