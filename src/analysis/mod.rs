//! Narrative analysis of tag statistics.
//!
//! In JSON-only mode the result is assembled locally with placeholder text.
//! The Ollama and remote API modes send a prompt built from the top tags to a
//! text generation backend and store its answer as the summary.

mod backend;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{Config, RunMode, INSIGHT_TOP_TAGS, PROMPT_TOP_TAGS};
use crate::error_handling::{AnalysisError, InitializationError, PersistenceError};
use crate::export::write_json_atomic;
use crate::initialization::init_analysis_client;
use crate::statistics::StatsResult;

/// One of the most frequent tags with a short description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInsight {
    pub tag: String,
    pub count: usize,
    pub description: String,
}

/// Analysis written next to the statistics file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(rename = "top_tags_insights")]
    pub top_tags: Vec<TagInsight>,
    pub trends: Vec<String>,
    pub suggestions: Vec<String>,
    pub raw_stats: StatsResult,
}

/// Connection details for the model backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSettings {
    pub ollama_url: String,
    pub ollama_model: String,
    pub api_endpoint: String,
    pub api_key: String,
}

impl From<&Config> for BackendSettings {
    fn from(config: &Config) -> Self {
        Self {
            ollama_url: config.ollama_url.clone(),
            ollama_model: config.ollama_model.clone(),
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

pub struct Analyzer {
    mode: RunMode,
    backend: BackendSettings,
    client: reqwest::Client,
}

impl Analyzer {
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn new(mode: RunMode, config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::with_client(
            mode,
            BackendSettings::from(config),
            init_analysis_client()?,
        ))
    }

    pub fn with_client(mode: RunMode, backend: BackendSettings, client: reqwest::Client) -> Self {
        Self {
            mode,
            backend,
            client,
        }
    }

    /// Produces the analysis for `stats` in the configured mode.
    ///
    /// # Errors
    ///
    /// Returns an `AnalysisError` if the backend cannot be reached, answers
    /// with a non-success status, or returns an unusable body.
    pub async fn analyze(&self, stats: &StatsResult) -> Result<AnalysisResult, AnalysisError> {
        match self.mode {
            RunMode::JsonOnly => {
                log::info!("Run mode: JSON output only, no model analysis");
                Ok(json_only_analysis(stats))
            }
            RunMode::Ollama => {
                log::info!(
                    "Run mode: Ollama analysis (model: {}, url: {})",
                    self.backend.ollama_model,
                    self.backend.ollama_url
                );
                let summary = backend::call_ollama(
                    &self.client,
                    &self.backend.ollama_url,
                    &self.backend.ollama_model,
                    &build_prompt(stats),
                )
                .await?;
                Ok(model_analysis(stats, summary, "Analyzed by the Ollama model"))
            }
            RunMode::Api => {
                log::info!(
                    "Run mode: remote API analysis (endpoint: {})",
                    self.backend.api_endpoint
                );
                let summary = backend::call_chat_api(
                    &self.client,
                    &self.backend.api_endpoint,
                    &self.backend.api_key,
                    &build_prompt(stats),
                )
                .await?;
                Ok(model_analysis(stats, summary, "Analyzed by the remote API"))
            }
        }
    }
}

fn insights(stats: &StatsResult, description: &str) -> Vec<TagInsight> {
    stats
        .top(INSIGHT_TOP_TAGS)
        .iter()
        .map(|stat| TagInsight {
            tag: stat.tag.clone(),
            count: stat.count,
            description: description.to_string(),
        })
        .collect()
}

fn json_only_analysis(stats: &StatsResult) -> AnalysisResult {
    AnalysisResult {
        summary: "JSON-only mode, no model analysis was performed".to_string(),
        top_tags: insights(stats, "Model analysis required for a description"),
        trends: vec!["Model analysis is required to derive trend insights".to_string()],
        suggestions: vec!["Run with --ollama or --api for an in-depth analysis".to_string()],
        raw_stats: stats.clone(),
    }
}

fn model_analysis(stats: &StatsResult, summary: String, description: &str) -> AnalysisResult {
    AnalysisResult {
        summary,
        top_tags: insights(stats, description),
        trends: Vec::new(),
        suggestions: Vec::new(),
        raw_stats: stats.clone(),
    }
}

/// Builds the prompt sent to the model backends.
pub fn build_prompt(stats: &StatsResult) -> String {
    let top_tags: String = stats
        .top(PROMPT_TOP_TAGS)
        .iter()
        .enumerate()
        .map(|(i, stat)| format!("{}. {} (count: {})\n", i + 1, stat.tag, stat.count))
        .collect();

    format!(
        "You are an expert analyst of bilibili video content. Analyze the following tag \
statistics collected from bilibili's recommended videos and provide professional content insights.

Statistics:
- Crawl time: {}
- Total videos: {}
- Distinct tags: {}

Top {} tags:
{}
Please analyze from these angles:
1. Content trends: what trends do these tags reflect?
2. Audience preferences: what kind of content are viewers most interested in?
3. Creator suggestions: what should uploaders focus on?

Answer in Chinese, concisely and professionally.",
        stats.crawl_time, stats.total_videos, stats.total_tags, PROMPT_TOP_TAGS, top_tags
    )
}

/// Path of the analysis file for a statistics file: `<dir>/<stem>_analysis.json`.
pub fn analysis_output_path(stats_path: &Path) -> PathBuf {
    let stem = stats_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tags_stats".to_string());
    stats_path.with_file_name(format!("{stem}_analysis.json"))
}

/// Writes the analysis as pretty JSON, creating parent directories as needed.
pub fn save_analysis_result(result: &AnalysisResult, path: &Path) -> Result<(), PersistenceError> {
    write_json_atomic(result, path)?;
    log::info!("Analysis saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::TagStat;
    use httptest::{all_of, matchers::*, responders::*, Expectation, Server};
    use serde_json::json;

    fn stats(tags: usize) -> StatsResult {
        StatsResult {
            crawl_time: "2024-05-01 12:00:00".to_string(),
            total_videos: 40,
            total_tags: tags,
            tag_stats: (0..tags)
                .map(|i| TagStat {
                    tag: format!("tag{i}"),
                    count: tags - i,
                })
                .collect(),
        }
    }

    fn analyzer(mode: RunMode, backend: BackendSettings) -> Analyzer {
        Analyzer::with_client(
            mode,
            backend,
            init_analysis_client().expect("client should build"),
        )
    }

    #[test]
    fn test_prompt_lists_top_twenty() {
        let prompt = build_prompt(&stats(25));
        assert!(prompt.contains("- Crawl time: 2024-05-01 12:00:00"));
        assert!(prompt.contains("- Total videos: 40"));
        assert!(prompt.contains("- Distinct tags: 25"));
        assert!(prompt.contains("1. tag0 (count: 25)\n"));
        assert!(prompt.contains("20. tag19 (count: 6)\n"));
        assert!(!prompt.contains("tag20"));
    }

    #[test]
    fn test_analysis_output_path() {
        assert_eq!(
            analysis_output_path(Path::new("results/tags_stats.json")),
            PathBuf::from("results/tags_stats_analysis.json")
        );
        assert_eq!(
            analysis_output_path(Path::new("out")),
            PathBuf::from("out_analysis.json")
        );
    }

    #[tokio::test]
    async fn test_json_only_analysis() {
        let result = analyzer(RunMode::JsonOnly, BackendSettings::default())
            .analyze(&stats(12))
            .await
            .expect("json-only never fails");

        assert_eq!(result.top_tags.len(), 10);
        assert_eq!(result.top_tags[0].tag, "tag0");
        assert_eq!(result.trends.len(), 1);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.raw_stats, stats(12));
    }

    #[tokio::test]
    async fn test_ollama_analysis() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/api/generate"),
                request::body(matches("\"model\":\"qwen2.5:7b\"")),
                request::body(matches("\"stream\":false")),
            ])
            .respond_with(json_encoded(json!({
                "model": "qwen2.5:7b",
                "created_at": "2024-05-01T12:00:00Z",
                "response": "Gaming dominates.",
                "done": true,
            }))),
        );

        let backend = BackendSettings {
            ollama_url: server.url("/").to_string(),
            ollama_model: "qwen2.5:7b".to_string(),
            ..Default::default()
        };
        let result = analyzer(RunMode::Ollama, backend)
            .analyze(&stats(3))
            .await
            .expect("ollama analysis");

        assert_eq!(result.summary, "Gaming dominates.");
        assert_eq!(result.top_tags.len(), 3);
        assert!(result.trends.is_empty());
    }

    #[tokio::test]
    async fn test_ollama_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/api/generate"))
                .respond_with(status_code(500).body("model not loaded")),
        );

        let backend = BackendSettings {
            ollama_url: server.url("/").to_string(),
            ollama_model: "qwen2.5:7b".to_string(),
            ..Default::default()
        };
        let err = analyzer(RunMode::Ollama, backend)
            .analyze(&stats(3))
            .await
            .expect_err("500 must fail");

        match err {
            AnalysisError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_analysis_sends_bearer_token() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/chat/completions"),
                request::headers(contains(("authorization", "Bearer secret"))),
                request::body(matches("\"model\":\"gpt-3.5-turbo\"")),
                request::body(matches("\"role\":\"user\"")),
            ])
            .respond_with(json_encoded(json!({
                "choices": [{"message": {"role": "assistant", "content": "Music is rising."}}]
            }))),
        );

        let backend = BackendSettings {
            api_endpoint: server.url("/v1/chat/completions").to_string(),
            api_key: "secret".to_string(),
            ..Default::default()
        };
        let result = analyzer(RunMode::Api, backend)
            .analyze(&stats(2))
            .await
            .expect("api analysis");

        assert_eq!(result.summary, "Music is rising.");
    }

    #[tokio::test]
    async fn test_api_error_object() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat")).respond_with(
                json_encoded(json!({"error": {"message": "invalid key"}})),
            ),
        );

        let backend = BackendSettings {
            api_endpoint: server.url("/chat").to_string(),
            ..Default::default()
        };
        let err = analyzer(RunMode::Api, backend)
            .analyze(&stats(2))
            .await
            .expect_err("error object must fail");

        assert!(matches!(err, AnalysisError::Api(ref message) if message == "invalid key"));
    }

    #[tokio::test]
    async fn test_api_empty_choices() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat"))
                .respond_with(json_encoded(json!({"choices": []}))),
        );

        let backend = BackendSettings {
            api_endpoint: server.url("/chat").to_string(),
            ..Default::default()
        };
        let err = analyzer(RunMode::Api, backend)
            .analyze(&stats(2))
            .await
            .expect_err("no choices must fail");

        assert!(matches!(err, AnalysisError::EmptyResponse));
    }

    #[test]
    fn test_analysis_result_json_shape() {
        let result = json_only_analysis(&stats(1));
        let value = serde_json::to_value(&result).expect("serialize");
        assert!(value.get("top_tags_insights").is_some());
        assert_eq!(value["raw_stats"]["total_videos"], 40);
    }

    #[test]
    fn test_save_analysis_result() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = analysis_output_path(&dir.path().join("results/tags_stats.json"));

        save_analysis_result(&json_only_analysis(&stats(2)), &path).expect("save");

        let loaded: AnalysisResult =
            serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("parse");
        assert_eq!(loaded.raw_stats.total_tags, 2);
    }
}
