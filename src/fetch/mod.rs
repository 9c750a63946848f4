//! Page fetching.
//!
//! This module provides:
//! - The `PageFetcher` seam used by link discovery and the concurrent crawler
//! - `HttpFetcher`, the `reqwest` implementation sending browser headers and the cookie
//! - `retry_get`, the fixed-delay retry wrapper around any `PageFetcher`

mod request;
mod retry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error_handling::{categorize_reqwest_error, FetchError, InitializationError};
use crate::initialization::init_client;

use request::RequestHeaders;

pub use retry::{retry_get, RetryPolicy};

/// Fetches the raw body of a page.
///
/// A non-success HTTP status is not an error at this layer: the body is
/// returned and callers decide whether it is useful. Every `Err` is treated as
/// retryable by [`retry_get`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// `PageFetcher` backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
    cookie: String,
}

impl HttpFetcher {
    /// Wraps an existing client. An empty `cookie` sends no cookie header.
    pub fn new(client: Arc<reqwest::Client>, cookie: impl Into<String>) -> Self {
        Self {
            client,
            cookie: cookie.into(),
        }
    }

    /// Builds a fetcher with the default client (30s timeout, 10 redirect hops).
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn with_cookie(cookie: impl Into<String>) -> Result<Self, InitializationError> {
        Ok(Self::new(init_client()?, cookie))
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("has_cookie", &!self.cookie.is_empty())
            .finish()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request = RequestHeaders::apply_to_request_builder(self.client.get(url), &self.cookie);

        let response = request
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("{} answered with status {}", url, status);
        }

        let body = response.bytes().await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        log::trace!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
