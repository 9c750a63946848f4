//! Bounded concurrent fetching of video pages.
//!
//! Every link becomes one spawned unit of work. A unit holds a semaphore permit
//! for its whole lifetime (stagger delay, retries and extraction), so at most
//! `max_concurrent` units are ever past the permit at once. Permits are taken
//! in link order before the unit is spawned.
//!
//! Units report a [`FetchOutcome`] over an mpsc channel to a single collector
//! task, which owns the round's result list. The round ends once every unit
//! has finished and the channel has closed.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::discovery::Link;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, RetryExhausted};
use crate::extract::TagExtractor;
use crate::fetch::{retry_get, PageFetcher, RetryPolicy};
use crate::initialization::init_semaphore;

/// Tags found on one successfully fetched video page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub link: Link,
    pub tags: Vec<String>,
}

/// What a single fetch unit produced.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(VideoInfo),
    Failed { link: Link, error: RetryExhausted },
}

/// Concurrency, retry and pacing knobs for [`VideoCrawler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    pub max_concurrent: usize,
    pub retry: RetryPolicy,
    /// Unit `i` sleeps `i * stagger_step` before its first request.
    pub stagger_step: Duration,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent: config.max_concurrent,
            retry: RetryPolicy::new(config.retry_count, config.retry_delay),
            stagger_step: config.stagger_step,
        }
    }

    /// Start delay of the unit at `index`.
    pub fn stagger_delay(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger_step.saturating_mul(index)
    }
}

/// Fetches video pages and extracts their tags.
pub struct VideoCrawler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn TagExtractor>,
    settings: CrawlSettings,
    stats: Arc<ProcessingStats>,
}

impl VideoCrawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn TagExtractor>,
        settings: CrawlSettings,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            settings,
            stats,
        }
    }

    /// Fetches every link and returns the pages that could be fetched.
    ///
    /// Links whose retries are exhausted are logged, counted and left out.
    /// The result is in arrival order, not link order.
    pub async fn fetch_all(&self, links: &[Link]) -> Vec<VideoInfo> {
        if links.is_empty() {
            return Vec::new();
        }

        let semaphore = init_semaphore(self.settings.max_concurrent);
        // Capacity covers every unit, so sends never wait on the collector
        let (tx, rx) = mpsc::channel::<FetchOutcome>(links.len());
        let collector = tokio::spawn(collect_outcomes(rx, Arc::clone(&self.stats)));

        let mut tasks = FuturesUnordered::new();

        for (index, link) in links.iter().enumerate() {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    log::warn!("Semaphore closed, skipping video: {}", link);
                    continue;
                }
            };

            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let stats = Arc::clone(&self.stats);
            let tx = tx.clone();
            let retry = self.settings.retry;
            let delay = self.settings.stagger_delay(index);
            let link = link.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit;

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let outcome = match retry_get(fetcher.as_ref(), link.as_str(), &retry, &stats).await
                {
                    Ok(body) => {
                        let tags = extractor.extract(&String::from_utf8_lossy(&body));
                        log::debug!("Extracted {} tags from {}", tags.len(), link);
                        FetchOutcome::Fetched(VideoInfo { link, tags })
                    }
                    Err(error) => FetchOutcome::Failed { link, error },
                };

                if tx.send(outcome).await.is_err() {
                    log::warn!("Result collector stopped before all fetches finished");
                }
            }));
        }

        // The collector finishes once the last unit drops its sender
        drop(tx);

        while let Some(task_result) = tasks.next().await {
            if let Err(join_error) = task_result {
                self.stats.increment_error(ErrorType::FetchTaskPanicked);
                log::warn!("Fetch task panicked: {:?}", join_error);
            }
        }

        match collector.await {
            Ok(videos) => {
                log::info!("Fetched {} of {} videos", videos.len(), links.len());
                videos
            }
            Err(join_error) => {
                log::error!("Result collector failed: {:?}", join_error);
                Vec::new()
            }
        }
    }
}

async fn collect_outcomes(
    mut rx: mpsc::Receiver<FetchOutcome>,
    stats: Arc<ProcessingStats>,
) -> Vec<VideoInfo> {
    let mut videos = Vec::new();
    while let Some(outcome) = rx.recv().await {
        match outcome {
            FetchOutcome::Fetched(video) => {
                if video.tags.is_empty() {
                    stats.increment_info(InfoType::VideoWithoutTags);
                }
                videos.push(video);
            }
            FetchOutcome::Failed { link, error } => {
                stats.increment_error(ErrorType::VideoDropped);
                log::warn!("Dropping {} from this round: {}", link, error);
            }
        }
    }
    videos
}
