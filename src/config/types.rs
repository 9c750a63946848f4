//! Configuration types.
//!
//! This module defines the library configuration struct and the enums shared
//! between the library and the command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use url::Url;

use super::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What happens to the aggregated statistics after a crawl.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Write the statistics file only.
    #[default]
    JsonOnly,
    /// Ask a local Ollama model for a narrative analysis.
    Ollama,
    /// Ask a remote OpenAI-compatible chat endpoint for a narrative analysis.
    Api,
}

impl RunMode {
    /// Resolves the mutually exclusive mode flags.
    ///
    /// No flag selects `JsonOnly`. Selecting more than one flag is reported and
    /// also falls back to `JsonOnly`.
    pub fn from_flags(json: bool, ollama: bool, api: bool) -> Self {
        let selected = [json, ollama, api].iter().filter(|flag| **flag).count();
        if selected > 1 {
            log::warn!("Only one run mode may be selected (--json, --ollama, --api); using JSON-only mode");
            return RunMode::JsonOnly;
        }
        if ollama {
            RunMode::Ollama
        } else if api {
            RunMode::Api
        } else {
            RunMode::JsonOnly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::JsonOnly => "json",
            RunMode::Ollama => "ollama",
            RunMode::Api => "api",
        }
    }

    /// Human-readable description including the backend the mode talks to.
    pub fn describe(&self, config: &Config) -> String {
        match self {
            RunMode::JsonOnly => "JSON output only (no model analysis)".to_string(),
            RunMode::Ollama => format!(
                "Ollama analysis (model: {}, url: {})",
                config.ollama_model, config.ollama_url
            ),
            RunMode::Api => format!("remote API analysis (endpoint: {})", config.api_endpoint),
        }
    }

    /// Checks that the options this mode needs are present.
    pub fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        let missing = |option| ConfigError::MissingModeOption {
            mode: self.as_str(),
            option,
        };
        match self {
            RunMode::JsonOnly => Ok(()),
            RunMode::Ollama if config.ollama_url.is_empty() => Err(missing("ollama-url")),
            RunMode::Ollama if config.ollama_model.is_empty() => Err(missing("ollama-model")),
            RunMode::Ollama => Ok(()),
            RunMode::Api if config.api_endpoint.is_empty() => Err(missing("api-endpoint")),
            RunMode::Api => Ok(()),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// Built from the JSON config file by `load_config`, then optionally adjusted
/// by command-line and environment overrides.
///
/// # Examples
///
/// ```no_run
/// use bili_tags::Config;
///
/// let config = Config {
///     cookie: "SESSDATA=...".to_string(),
///     crawl_count: 3,
///     max_concurrent: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Cookie header forwarded with every page request
    pub cookie: String,

    /// Homepage the video links are discovered from
    pub homepage_url: Url,

    /// Number of crawl rounds
    pub crawl_count: u32,

    /// Pause between rounds
    pub crawl_interval: Duration,

    /// Accepted from the config file and logged; see `STAGGER_STEP`
    pub request_interval: Duration,

    /// Maximum concurrent video page fetches
    pub max_concurrent: usize,

    /// Attempts per request (minimum 1)
    pub retry_count: u32,

    /// Pause between attempts of one request
    pub retry_delay: Duration,

    /// Per-link delay before a fetch unit starts
    pub stagger_step: Duration,

    /// Where the statistics JSON is written
    pub output_file: PathBuf,

    pub ollama_url: String,
    pub ollama_model: String,
    pub api_endpoint: String,
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            homepage_url: default_homepage_url(),
            crawl_count: DEFAULT_CRAWL_COUNT,
            crawl_interval: Duration::from_secs(DEFAULT_CRAWL_INTERVAL_SECS),
            request_interval: Duration::from_millis(DEFAULT_REQUEST_INTERVAL_MS),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            stagger_step: STAGGER_STEP,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            api_endpoint: String::new(),
            api_key: String::new(),
        }
    }
}

pub(crate) fn default_homepage_url() -> Url {
    Url::parse(DEFAULT_HOMEPAGE_URL).expect("DEFAULT_HOMEPAGE_URL is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_run_mode_from_single_flag() {
        assert_eq!(RunMode::from_flags(false, false, false), RunMode::JsonOnly);
        assert_eq!(RunMode::from_flags(true, false, false), RunMode::JsonOnly);
        assert_eq!(RunMode::from_flags(false, true, false), RunMode::Ollama);
        assert_eq!(RunMode::from_flags(false, false, true), RunMode::Api);
    }

    #[test]
    fn test_run_mode_conflicting_flags_fall_back_to_json() {
        assert_eq!(RunMode::from_flags(false, true, true), RunMode::JsonOnly);
        assert_eq!(RunMode::from_flags(true, true, true), RunMode::JsonOnly);
    }

    #[test]
    fn test_run_mode_validate_api_needs_endpoint() {
        let config = Config::default();
        assert!(matches!(
            RunMode::Api.validate(&config),
            Err(ConfigError::MissingModeOption {
                option: "api-endpoint",
                ..
            })
        ));

        let config = Config {
            api_endpoint: "https://api.example.com/v1/chat/completions".to_string(),
            ..Default::default()
        };
        assert!(RunMode::Api.validate(&config).is_ok());
    }

    #[test]
    fn test_run_mode_validate_ollama_needs_model() {
        let config = Config {
            ollama_model: String::new(),
            ..Default::default()
        };
        assert!(RunMode::Ollama.validate(&config).is_err());
        assert!(RunMode::Ollama.validate(&Config::default()).is_ok());
        assert!(RunMode::JsonOnly.validate(&config).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.crawl_count, 1);
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.stagger_step, Duration::from_millis(800));
        assert_eq!(config.homepage_url.as_str(), "https://www.bilibili.com/");
    }
}
