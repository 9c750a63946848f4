//! Error type definitions.
//!
//! This module defines the error enums used throughout the crawler together with
//! the error and info categories tracked by `ProcessingStats`.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// A single page fetch failed.
///
/// Every variant is treated as transient by the retry wrapper.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the per-request timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The redirect chain exceeded the hop limit.
    #[error("too many redirects (limit {limit}) fetching {url}")]
    TooManyRedirects { url: String, limit: usize },

    /// Connection, DNS or other transport failure.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: ReqwestError,
    },
}

/// All retry attempts for a URL failed.
#[derive(Error, Debug)]
#[error("giving up on {url} after {attempts} attempt(s): {source}")]
pub struct RetryExhausted {
    pub url: String,
    pub attempts: u32,
    /// The error returned by the final attempt.
    #[source]
    pub source: FetchError,
}

/// Errors reading or writing result files.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize results for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that abort a crawl run.
#[derive(Error, Debug)]
pub enum RunError {
    /// No round produced a single video.
    #[error("no video data collected in {rounds} round(s); check the network connection and that the cookie is valid")]
    NoDataCollected { rounds: u32 },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

/// Errors loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("a valid bilibili cookie must be set in the config file")]
    MissingCookie,

    #[error("invalid homepage_url '{value}': {source}")]
    InvalidHomepage {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// The selected run mode needs an option that was left empty.
    #[error("{mode} mode requires --{option}")]
    MissingModeOption {
        mode: &'static str,
        option: &'static str,
    },
}

/// Errors from the narrative analysis backends.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: ReqwestError,
    },

    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: ReqwestError,
    },

    /// The remote API answered with an error object.
    #[error("API error: {0}")]
    Api(String),

    #[error("API returned no choices")]
    EmptyResponse,
}

/// Types of errors counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Per-attempt fetch failures
    FetchTimeout,
    FetchTooManyRedirects,
    FetchRequestError,
    FetchBodyError,
    // Outcomes after retries
    VideoDropped,
    HomepageFailed,
    FetchTaskPanicked,
}

/// Types of informational events counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    RetriedAttempt,
    RoundSkippedNoLinks,
    VideoWithoutTags,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FetchTimeout => "Fetch timeout",
            ErrorType::FetchTooManyRedirects => "Too many redirects",
            ErrorType::FetchRequestError => "Fetch request error",
            ErrorType::FetchBodyError => "Fetch body error",
            ErrorType::VideoDropped => "Video dropped after retries",
            ErrorType::HomepageFailed => "Homepage fetch failed",
            ErrorType::FetchTaskPanicked => "Fetch task panicked",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::RetriedAttempt => "Retried attempt",
            InfoType::RoundSkippedNoLinks => "Round skipped (no links)",
            InfoType::VideoWithoutTags => "Video page without tags",
        }
    }
}
