//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP clients (page fetching and analysis backends)
//! - Logger
//! - The concurrency semaphore for fetch units

mod client;
mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_analysis_client, init_client, init_client_with_timeout};
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// The count is clamped to `1..=Semaphore::MAX_PERMITS`: zero would deadlock
/// the first fetch unit and anything above the maximum is rejected by tokio.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent fetch units allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.clamp(1, Semaphore::MAX_PERMITS)))
}
