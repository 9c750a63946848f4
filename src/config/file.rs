//! Config file loading.
//!
//! The config file is a JSON object. Missing keys and non-positive numbers fall
//! back to the defaults in `constants`; the cookie is the only required value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::constants::*;
use super::types::Config;
use crate::error_handling::ConfigError;

/// On-disk representation of the config file.
///
/// Numbers are signed so that `0` and negative values can be detected and
/// replaced with defaults instead of failing to parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub cookie: String,
    pub crawl_count: i64,
    pub crawl_interval: i64,
    pub request_interval: i64,
    pub max_concurrent: i64,
    pub retry_count: i64,
    pub retry_delay: i64,
    pub output_file: String,
    pub homepage_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub api_endpoint: String,
    pub api_key: String,
}

fn positive_or(value: i64, default: u64) -> u64 {
    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl FileConfig {
    /// Validates the file values and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCookie` if the cookie is empty or still the
    /// sample placeholder, and `ConfigError::InvalidHomepage` if `homepage_url`
    /// is set but does not parse.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let cookie = self.cookie.trim().to_string();
        if cookie.is_empty() || COOKIE_PLACEHOLDERS.contains(&cookie.as_str()) {
            return Err(ConfigError::MissingCookie);
        }

        let homepage = non_empty_or(self.homepage_url, DEFAULT_HOMEPAGE_URL);
        let homepage_url =
            Url::parse(&homepage).map_err(|source| ConfigError::InvalidHomepage {
                value: homepage.clone(),
                source,
            })?;

        let crawl_count = positive_or(self.crawl_count, u64::from(DEFAULT_CRAWL_COUNT));
        let retry_count = positive_or(self.retry_count, u64::from(DEFAULT_RETRY_COUNT));
        let max_concurrent = positive_or(self.max_concurrent, DEFAULT_MAX_CONCURRENT as u64);

        Ok(Config {
            cookie,
            homepage_url,
            crawl_count: u32::try_from(crawl_count).unwrap_or(u32::MAX),
            crawl_interval: Duration::from_secs(positive_or(
                self.crawl_interval,
                DEFAULT_CRAWL_INTERVAL_SECS,
            )),
            request_interval: Duration::from_millis(positive_or(
                self.request_interval,
                DEFAULT_REQUEST_INTERVAL_MS,
            )),
            max_concurrent: usize::try_from(max_concurrent).unwrap_or(usize::MAX),
            retry_count: u32::try_from(retry_count).unwrap_or(u32::MAX),
            retry_delay: Duration::from_secs(positive_or(
                self.retry_delay,
                DEFAULT_RETRY_DELAY_SECS,
            )),
            stagger_step: STAGGER_STEP,
            output_file: PathBuf::from(non_empty_or(self.output_file, DEFAULT_OUTPUT_FILE)),
            ollama_url: non_empty_or(self.ollama_url, DEFAULT_OLLAMA_URL),
            ollama_model: non_empty_or(self.ollama_model, DEFAULT_OLLAMA_MODEL),
            api_endpoint: self.api_endpoint,
            api_key: self.api_key,
        })
    }
}

/// Resolves a config path the way users expect when launching the binary
/// from an arbitrary directory.
///
/// Absolute paths are returned unchanged. A relative path is tried against the
/// current directory, then against the executable's directory. If neither
/// exists the current-directory path is returned so the read error names it.
pub fn resolve_config_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let cwd_path = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    if cwd_path.exists() {
        return cwd_path;
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let exe_path = exe_dir.join(path);
        if exe_path.exists() {
            return exe_path;
        }
    }

    cwd_path
}

/// Reads, parses and validates the config file at `path`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or parsed, or if
/// validation fails (see [`FileConfig::into_config`]).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let resolved = resolve_config_path(path);
    log::debug!("Loading config from {}", resolved.display());

    let data = std::fs::read_to_string(&resolved).map_err(|source| ConfigError::Read {
        path: resolved.clone(),
        source,
    })?;
    let file_config: FileConfig =
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: resolved.clone(),
            source,
        })?;

    file_config.into_config()
}
