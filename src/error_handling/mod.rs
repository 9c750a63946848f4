//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (`thiserror` enums for every failure domain)
//! - Processing statistics tracking (errors and info events)
//! - Categorization of HTTP client failures
//!
//! Only `RunError`, `PersistenceError` and `ConfigError` end a run. Fetch
//! failures are retried, counted and logged, never propagated past a round.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, error_type_for, update_error_stats};
pub use stats::ProcessingStats;
pub use types::{
    AnalysisError, ConfigError, ErrorType, FetchError, InfoType, InitializationError,
    PersistenceError, RetryExhausted, RunError,
};
