//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_USER_AGENT, MAX_REDIRECT_HOPS, REQUEST_TIMEOUT};

/// Initializes the HTTP client shared by every fetch of a run.
///
/// Creates a `reqwest::Client` configured with:
/// - The browser User-Agent from `DEFAULT_USER_AGENT`
/// - A 30 second per-request timeout
/// - Redirect following capped at `MAX_REDIRECT_HOPS`
///
/// The client owns the connection pool, so it is wrapped in an `Arc` and reused
/// across rounds rather than rebuilt per request.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<Arc<reqwest::Client>, reqwest::Error> {
    init_client_with_timeout(REQUEST_TIMEOUT)
}

/// Same as [`init_client`] with a caller-chosen request timeout.
pub fn init_client_with_timeout(timeout: Duration) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client used for analysis backends.
///
/// Model responses can take minutes, so this client uses `ANALYSIS_TIMEOUT`
/// instead of the page fetch timeout.
pub fn init_analysis_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(crate::config::ANALYSIS_TIMEOUT)
        .build()
}
