//! Error categorization.
//!
//! Maps `reqwest` failures onto `FetchError` variants and `FetchError` variants
//! onto the counters kept by `ProcessingStats`.

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError};
use crate::config::MAX_REDIRECT_HOPS;

/// Classifies a `reqwest::Error` raised while sending a request.
///
/// Redirect errors only come from the hop limit in the client's redirect policy,
/// so they map to `TooManyRedirects`.
pub fn categorize_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        FetchError::TooManyRedirects {
            url: url.to_string(),
            limit: MAX_REDIRECT_HOPS,
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Returns the stats counter a fetch error belongs to.
pub fn error_type_for(error: &FetchError) -> ErrorType {
    match error {
        FetchError::Timeout { .. } => ErrorType::FetchTimeout,
        FetchError::TooManyRedirects { .. } => ErrorType::FetchTooManyRedirects,
        FetchError::Request { .. } => ErrorType::FetchRequestError,
        FetchError::Body { .. } => ErrorType::FetchBodyError,
    }
}

/// Records a single failed fetch attempt.
pub fn update_error_stats(stats: &ProcessingStats, error: &FetchError) {
    stats.increment_error(error_type_for(error));
}
