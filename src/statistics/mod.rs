//! Tag frequency aggregation.
//!
//! Counts how many fetched videos carried each tag, across one or more crawl
//! rounds, and ranks the tags by that count. Videos that failed to fetch never
//! reach this module, so they count neither as videos nor as tags.

mod report;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crawler::VideoInfo;

pub use report::{load_stats_from_file, log_summary, save_results};

/// Timestamp format of [`StatsResult::crawl_time`].
pub const CRAWL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Occurrence count of one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStat {
    pub tag: String,
    pub count: usize,
}

/// Aggregated tag report of a crawl run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResult {
    /// Local time of aggregation, formatted with [`CRAWL_TIME_FORMAT`].
    pub crawl_time: String,
    pub total_videos: usize,
    /// Number of distinct tags.
    pub total_tags: usize,
    /// Sorted by `count`, highest first.
    pub tag_stats: Vec<TagStat>,
}

impl StatsResult {
    /// The `n` most frequent tags.
    pub fn top(&self, n: usize) -> &[TagStat] {
        &self.tag_stats[..n.min(self.tag_stats.len())]
    }
}

/// Aggregates the videos of every round into one ranked report.
///
/// Videos are counted every time they were fetched, including a link that was
/// crawled again in a later round. Tags with equal counts keep the order in
/// which they were first seen.
pub fn aggregate(rounds: &[Vec<VideoInfo>]) -> StatsResult {
    summarize(rounds.iter().map(Vec::len).sum(), rounds.iter().flatten())
}

/// Single-round form of [`aggregate`].
pub fn count_tags(videos: &[VideoInfo]) -> StatsResult {
    summarize(videos.len(), videos.iter())
}

fn summarize<'a>(total_videos: usize, videos: impl Iterator<Item = &'a VideoInfo>) -> StatsResult {
    let tag_stats = rank_tags(videos);

    StatsResult {
        crawl_time: chrono::Local::now().format(CRAWL_TIME_FORMAT).to_string(),
        total_videos,
        total_tags: tag_stats.len(),
        tag_stats,
    }
}

fn rank_tags<'a>(videos: impl Iterator<Item = &'a VideoInfo>) -> Vec<TagStat> {
    // Index into `tag_stats` keeps first-seen order for the stable sort below
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut tag_stats: Vec<TagStat> = Vec::new();

    for tag in videos.flat_map(|video| video.tags.iter()) {
        match positions.get(tag.as_str()) {
            Some(&index) => tag_stats[index].count += 1,
            None => {
                positions.insert(tag.as_str(), tag_stats.len());
                tag_stats.push(TagStat {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    tag_stats.sort_by(|a, b| b.count.cmp(&a.count));
    tag_stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::canonicalize_link;
    use url::Url;

    fn video(id: &str, tags: &[&str]) -> VideoInfo {
        let base = Url::parse("https://www.bilibili.com").expect("valid base");
        VideoInfo {
            link: canonicalize_link(&base, &format!("/video/{id}")).expect("video link"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn pairs(result: &StatsResult) -> Vec<(&str, usize)> {
        result
            .tag_stats
            .iter()
            .map(|s| (s.tag.as_str(), s.count))
            .collect()
    }

    #[test]
    fn test_three_video_example() {
        let round = vec![
            video("BV1a", &["game", "review"]),
            video("BV1b", &["game"]),
            video("BV1c", &["music"]),
        ];

        let result = aggregate(&[round]);

        assert_eq!(result.total_videos, 3);
        assert_eq!(result.total_tags, 3);
        assert_eq!(pairs(&result), vec![("game", 2), ("review", 1), ("music", 1)]);
    }

    #[test]
    fn test_aggregate_empty() {
        for rounds in [vec![], vec![Vec::new(), Vec::new()]] {
            let result = aggregate(&rounds);
            assert_eq!(result.total_videos, 0);
            assert_eq!(result.total_tags, 0);
            assert!(result.tag_stats.is_empty());
        }
    }

    #[test]
    fn test_aggregate_counts_repeated_links_per_round() {
        let first = vec![video("BV1a", &["game"])];
        let second = vec![video("BV1a", &["game"]), video("BV1b", &[])];

        let result = aggregate(&[first, second]);

        assert_eq!(result.total_videos, 3);
        assert_eq!(pairs(&result), vec![("game", 2)]);
    }

    #[test]
    fn test_aggregate_is_commutative_over_rounds() {
        let a = vec![video("BV1a", &["game", "review"]), video("BV1b", &["anime"])];
        let b = vec![video("BV1c", &["music", "game"])];
        let c = vec![video("BV1d", &["anime", "review"]), video("BV1e", &["vlog"])];

        let mut expected = pairs(&aggregate(&[a.clone(), b.clone(), c.clone()]))
            .into_iter()
            .map(|(t, n)| (t.to_string(), n))
            .collect::<Vec<_>>();
        expected.sort();

        for order in [
            vec![b.clone(), a.clone(), c.clone()],
            vec![c.clone(), b.clone(), a.clone()],
            vec![a.clone(), c.clone(), b.clone()],
        ] {
            let mut got = pairs(&aggregate(&order))
                .into_iter()
                .map(|(t, n)| (t.to_string(), n))
                .collect::<Vec<_>>();
            got.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_tag_stats_strictly_non_increasing() {
        let round = vec![
            video("BV1a", &["x", "y", "z"]),
            video("BV1b", &["z", "y"]),
            video("BV1c", &["z"]),
        ];
        let result = aggregate(&[round]);
        assert_eq!(pairs(&result), vec![("z", 3), ("y", 2), ("x", 1)]);
        assert!(result.tag_stats.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_ties_are_deterministic() {
        let round = vec![video("BV1a", &["b", "a"]), video("BV1b", &["c"])];
        let first = pairs(&aggregate(&[round.clone()]))
            .into_iter()
            .map(|(t, _)| t.to_string())
            .collect::<Vec<_>>();
        for _ in 0..10 {
            let again = pairs(&aggregate(&[round.clone()]))
                .into_iter()
                .map(|(t, _)| t.to_string())
                .collect::<Vec<_>>();
            assert_eq!(again, first);
        }
        assert_eq!(first, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_count_tags_matches_single_round_aggregate() {
        let round = vec![video("BV1a", &["game"]), video("BV1b", &["game", "music"])];
        let single = count_tags(&round);
        assert_eq!(single.total_videos, 2);
        assert_eq!(pairs(&single), vec![("game", 2), ("music", 1)]);
    }

    #[test]
    fn test_crawl_time_format() {
        let result = aggregate(&[]);
        assert!(
            chrono::NaiveDateTime::parse_from_str(&result.crawl_time, CRAWL_TIME_FORMAT).is_ok(),
            "unexpected crawl_time {}",
            result.crawl_time
        );
    }

    #[test]
    fn test_top_is_clamped() {
        let result = aggregate(&[vec![video("BV1a", &["game", "music"])]]);
        assert_eq!(result.top(10).len(), 2);
        assert_eq!(result.top(1)[0].tag, "game");
    }

    #[test]
    fn test_stats_result_json_shape() {
        let result = StatsResult {
            crawl_time: "2024-05-01 12:00:00".to_string(),
            total_videos: 1,
            total_tags: 1,
            tag_stats: vec![TagStat {
                tag: "game".to_string(),
                count: 1,
            }],
        };
        assert_eq!(
            serde_json::to_value(&result).expect("serialize"),
            serde_json::json!({
                "crawl_time": "2024-05-01 12:00:00",
                "total_videos": 1,
                "total_tags": 1,
                "tag_stats": [{"tag": "game", "count": 1}],
            })
        );
    }
}
