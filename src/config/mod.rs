//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, markup markers, defaults)
//! - The library `Config` and the `RunMode` selecting post-crawl analysis
//! - JSON config file loading
//! - CLI option parsing

mod cli;
mod constants;
mod file;
mod types;

pub use cli::Cli;
pub use constants::*;
pub use file::{load_config, resolve_config_path, FileConfig};
pub use types::{Config, LogFormat, LogLevel, RunMode};
