//! Multi-round crawl orchestration.
//!
//! Each round discovers links on the homepage and fetches every linked video.
//! A round whose homepage fails or yields no links is skipped; the run only
//! fails when no round produced a single video, or when the report cannot be
//! written.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::app::print_error_statistics;
use crate::config::Config;
use crate::crawler::{CrawlSettings, VideoCrawler, VideoInfo};
use crate::discovery::HomepageCrawler;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, RunError};
use crate::extract::ClassMarkerExtractor;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::statistics::{aggregate, log_summary, save_results, StatsResult};

/// Outcome of a completed crawl run.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The aggregated statistics that were written to `output_file`
    pub stats: StatsResult,
    pub output_file: PathBuf,
    pub rounds_attempted: u32,
    /// Rounds that reached the video fetch stage
    pub rounds_completed: u32,
    /// Rounds skipped because the homepage failed or had no video links
    pub rounds_skipped: u32,
    /// Videos dropped after exhausting their retries, over all rounds
    pub dropped_videos: usize,
    pub elapsed_seconds: f64,
}

/// Where the run currently is. Transitions are logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    RoundRunning(u32),
    RoundComplete(u32),
    Aggregating,
    Done,
    Failed,
}

fn transition(state: &mut CrawlState, next: CrawlState) {
    debug!("Crawl state: {:?} -> {:?}", state, next);
    *state = next;
}

/// Runs every configured round against the live portal and saves the report.
///
/// # Errors
///
/// - `RunError::Initialization` if the HTTP client cannot be built
/// - `RunError::NoDataCollected` if no round fetched any video
/// - `RunError::Persistence` if the report cannot be written
pub async fn run_crawl(config: Config) -> Result<CrawlReport, RunError> {
    let fetcher = HttpFetcher::with_cookie(config.cookie.clone())?;
    run_crawl_with(config, Arc::new(fetcher)).await
}

/// Same as [`run_crawl`] with a caller-supplied page fetcher.
pub async fn run_crawl_with(
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<CrawlReport, RunError> {
    let start_time = Instant::now();
    let mut state = CrawlState::Idle;
    log_config(&config);

    let stats = Arc::new(ProcessingStats::new());
    let settings = CrawlSettings::from_config(&config);
    let homepage = HomepageCrawler::new(
        Arc::clone(&fetcher),
        config.homepage_url.clone(),
        settings.retry,
        Arc::clone(&stats),
    );
    let crawler = VideoCrawler::new(
        fetcher,
        Arc::new(ClassMarkerExtractor::default()),
        settings,
        Arc::clone(&stats),
    );

    let total_rounds = config.crawl_count;
    let mut rounds: Vec<Vec<VideoInfo>> = Vec::new();
    let mut rounds_skipped = 0u32;

    for round in 1..=total_rounds {
        transition(&mut state, CrawlState::RoundRunning(round));
        info!("--- Round {}/{} ---", round, total_rounds);

        match homepage.discover().await {
            Err(e) => {
                warn!("Skipping round {}: homepage fetch failed: {}", round, e);
                rounds_skipped += 1;
            }
            Ok(links) if links.is_empty() => {
                warn!(
                    "Skipping round {}: no video links on {} (the page may need a headless browser)",
                    round,
                    homepage.homepage()
                );
                stats.increment_info(InfoType::RoundSkippedNoLinks);
                rounds_skipped += 1;
            }
            Ok(links) => {
                info!("Found {} video links", links.len());
                let videos = crawler.fetch_all(&links).await;
                info!("Round {}/{} complete: {} videos", round, total_rounds, videos.len());
                rounds.push(videos);
                transition(&mut state, CrawlState::RoundComplete(round));

                // Skipped rounds move straight on to the next one
                if round < total_rounds {
                    info!(
                        "Waiting {}s before the next round",
                        config.crawl_interval.as_secs()
                    );
                    tokio::time::sleep(config.crawl_interval).await;
                }
            }
        }
    }

    let total_videos: usize = rounds.iter().map(Vec::len).sum();
    if total_videos == 0 {
        transition(&mut state, CrawlState::Failed);
        print_error_statistics(&stats);
        return Err(RunError::NoDataCollected {
            rounds: total_rounds,
        });
    }

    transition(&mut state, CrawlState::Aggregating);
    let result = aggregate(&rounds);
    log_summary(&result);
    save_results(&result, &config.output_file)?;
    transition(&mut state, CrawlState::Done);

    print_error_statistics(&stats);

    Ok(CrawlReport {
        stats: result,
        output_file: config.output_file,
        rounds_attempted: total_rounds,
        rounds_completed: u32::try_from(rounds.len()).unwrap_or(u32::MAX),
        rounds_skipped,
        dropped_videos: stats.get_error_count(ErrorType::VideoDropped),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

fn log_config(config: &Config) {
    info!("Configuration:");
    info!("  - Homepage: {}", config.homepage_url);
    info!("  - Crawl rounds: {}", config.crawl_count);
    info!("  - Round interval: {}s", config.crawl_interval.as_secs());
    info!(
        "  - Request interval: {}ms (requests are paced by the {}ms per-link stagger)",
        config.request_interval.as_millis(),
        config.stagger_step.as_millis()
    );
    info!("  - Max concurrent: {}", config.max_concurrent);
    info!(
        "  - Retries: {} attempts, {}s apart",
        config.retry_count,
        config.retry_delay.as_secs()
    );
    info!("  - Output file: {}", config.output_file.display());
}
