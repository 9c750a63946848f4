//! Saving, loading and summarizing a `StatsResult`.

use std::path::Path;

use log::info;

use super::StatsResult;
use crate::config::SUMMARY_TOP_TAGS;
use crate::error_handling::PersistenceError;
use crate::export::{read_json, write_json_atomic};

/// Writes the report as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns a `PersistenceError` if the directory, serialization or write fails.
pub fn save_results(result: &StatsResult, path: &Path) -> Result<(), PersistenceError> {
    write_json_atomic(result, path)?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// Loads a report written by [`save_results`].
pub fn load_stats_from_file(path: &Path) -> Result<StatsResult, PersistenceError> {
    let stats: StatsResult = read_json(path)?;
    info!(
        "Loaded stats from {}: {} videos, {} distinct tags",
        path.display(),
        stats.total_videos,
        stats.total_tags
    );
    Ok(stats)
}

/// Logs totals and the most frequent tags.
pub fn log_summary(result: &StatsResult) {
    info!("Tag statistics:");
    info!("  Total videos: {}", result.total_videos);
    info!("  Distinct tags: {}", result.total_tags);

    let top = result.top(SUMMARY_TOP_TAGS);
    if top.is_empty() {
        return;
    }
    info!("  Top {} tags:", top.len());
    for (rank, stat) in top.iter().enumerate() {
        info!("    {}. {} ({})", rank + 1, stat.tag, stat.count);
    }
}
