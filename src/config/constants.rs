//! Configuration constants.
//!
//! This module defines the constants used throughout the crawler, including
//! timeouts, limits, markup markers and the defaults applied to the config file.

use std::time::Duration;

/// Homepage crawled for recommended videos when the config file names none.
pub const DEFAULT_HOMEPAGE_URL: &str = "https://www.bilibili.com";

/// Substring an anchor's `href` must contain to count as a video link.
pub const VIDEO_PATH_MARKER: &str = "/video/BV";

/// Substring an anchor's `class` attribute must contain to count as a tag.
pub const TAG_CLASS_MARKER: &str = "tag";

/// Tags must be strictly shorter than this many characters.
pub const MAX_TAG_CHARS: usize = 20;

// Network
/// Per-request timeout for page fetches.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum number of redirect hops to follow before failing with `TooManyRedirects`.
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Timeout for calls to the analysis backends (Ollama or remote chat API).
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);

/// Delay added per link index before a fetch unit issues its first request.
///
/// Unit `i` waits `i * STAGGER_STEP`, so a round of `n` links takes at least
/// `(n - 1) * STAGGER_STEP` regardless of the concurrency cap.
pub const STAGGER_STEP: Duration = Duration::from_millis(800);

/// Default User-Agent string for HTTP requests.
///
/// Mimics a desktop Chrome on Windows; the portal serves a stripped page to
/// clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Config file defaults (applied when a value is missing or non-positive)
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_CRAWL_COUNT: u32 = 1;
/// Seconds between crawl rounds.
pub const DEFAULT_CRAWL_INTERVAL_SECS: u64 = 300;
/// Milliseconds; accepted for compatibility, pacing is governed by `STAGGER_STEP`.
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 500;
pub const DEFAULT_MAX_CONCURRENT: usize = 3;
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Seconds between retry attempts.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_OUTPUT_FILE: &str = "results/tags_stats.json";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:7b";
/// Model name sent to OpenAI-compatible chat endpoints.
pub const DEFAULT_API_MODEL: &str = "gpt-3.5-turbo";

/// Placeholders shipped in sample configs; treated the same as a missing cookie.
pub const COOKIE_PLACEHOLDERS: &[&str] = &["your_cookie_here", "你的B站Cookie"];

// Environment variable names
pub const ENV_CONFIG_PATH: &str = "BILI_CONFIG_PATH";
pub const ENV_OLLAMA_URL: &str = "BILI_OLLAMA_URL";
pub const ENV_OLLAMA_MODEL: &str = "BILI_OLLAMA_MODEL";
pub const ENV_API_ENDPOINT: &str = "BILI_API_ENDPOINT";
pub const ENV_API_KEY: &str = "BILI_API_KEY";

// Reporting
/// Number of tags logged in the end-of-run summary.
pub const SUMMARY_TOP_TAGS: usize = 10;
/// Number of tags included in the analysis prompt.
pub const PROMPT_TOP_TAGS: usize = 20;
/// Number of tags described in an analysis result.
pub const INSIGHT_TOP_TAGS: usize = 10;
