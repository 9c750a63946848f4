//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

use super::constants::*;
use super::types::{Config, LogFormat, LogLevel, RunMode};

/// Command-line options.
///
/// Values given here (or through the matching `BILI_*` environment variables)
/// override the config file.
///
/// # Examples
///
/// ```bash
/// # Crawl and write the statistics file only
/// bili_tags --json
///
/// # Crawl, then ask a local Ollama model to interpret the tags
/// bili_tags --ollama --ollama-model qwen2.5:7b
///
/// # Analyze a previous run without crawling
/// bili_tags --api --api-endpoint https://api.example.com/v1/chat/completions --input results/tags_stats.json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "bili_tags",
    about = "Crawls bilibili recommended videos and ranks their tags."
)]
pub struct Cli {
    /// Config file path
    #[arg(long, env = ENV_CONFIG_PATH, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Only write the statistics JSON, no model analysis
    #[arg(long)]
    pub json: bool,

    /// Analyze the statistics with a local Ollama model
    #[arg(long)]
    pub ollama: bool,

    /// Analyze the statistics with a remote chat API
    #[arg(long)]
    pub api: bool,

    /// Ollama server address
    #[arg(long, env = ENV_OLLAMA_URL)]
    pub ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long, env = ENV_OLLAMA_MODEL)]
    pub ollama_model: Option<String>,

    /// Remote chat API endpoint
    #[arg(long, env = ENV_API_ENDPOINT)]
    pub api_endpoint: Option<String>,

    /// Remote chat API key (sent as a bearer token)
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Existing statistics JSON to analyze instead of crawling
    #[arg(long, value_parser)]
    pub input: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_flags(self.json, self.ollama, self.api)
    }

    /// Copies the analysis backend options given on the command line (or via
    /// environment) over the values loaded from the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(model) = &self.ollama_model {
            config.ollama_model = model.clone();
        }
        if let Some(endpoint) = &self.api_endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = key.clone();
        }
    }
}
