//! bili_tags library: crawl bilibili recommended videos and rank their tags
//!
//! A run discovers video links on the homepage, fetches every video page under
//! a concurrency cap (with retries and a staggered start), extracts the tag
//! anchors from each page and aggregates tag frequencies over one or more
//! rounds into a ranked report. The report can then be handed to a local
//! Ollama model or a remote chat API for a narrative analysis.
//!
//! # Example
//!
//! ```no_run
//! use bili_tags::{run_crawl, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     cookie: "SESSDATA=...".to_string(),
//!     crawl_count: 2,
//!     ..Default::default()
//! };
//!
//! let report = run_crawl(config).await?;
//! println!(
//!     "{} videos, {} distinct tags, saved to {}",
//!     report.stats.total_videos,
//!     report.stats.total_tags,
//!     report.output_file.display()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod analysis;
mod app;
pub mod config;
pub mod crawler;
pub mod discovery;
pub mod error_handling;
mod export;
pub mod extract;
pub mod fetch;
pub mod initialization;
mod run;
pub mod statistics;
mod utils;

// Re-export public API
pub use analysis::{analysis_output_path, save_analysis_result, AnalysisResult, Analyzer};
pub use config::{load_config, Cli, Config, LogFormat, LogLevel, RunMode};
pub use crawler::{CrawlSettings, VideoCrawler, VideoInfo};
pub use discovery::{discover_links, HomepageCrawler, Link};
pub use error_handling::{ProcessingStats, RunError};
pub use export::{read_json, write_json_atomic};
pub use extract::{extract_tags, ClassMarkerExtractor, TagExtractor};
pub use fetch::{retry_get, HttpFetcher, PageFetcher, RetryPolicy};
pub use run::{run_crawl, run_crawl_with, CrawlReport, CrawlState};
pub use statistics::{aggregate, count_tags, load_stats_from_file, save_results, StatsResult, TagStat};
