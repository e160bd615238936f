use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;
use crate::youtube::VideoInfo;

/// One classified comment inside a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSentiment {
    pub text: String,
    pub author: String,
    pub likes: u64,
    pub sentiment: Sentiment,
}

/// Aggregate counters over the classified comments of one analysis.
///
/// `total_comments` counts classified comments only, so
/// `positive_count + negative_count == total_comments` always holds;
/// comments whose prediction faulted are tallied in `skipped_comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentStats {
    pub total_comments: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub skipped_comments: usize,
}

/// The unit persisted to storage. Built once per request, then immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub video_info: VideoInfo,
    pub statistics: SentimentStats,
    pub comments: Vec<CommentSentiment>,
}

impl SentimentStats {
    pub fn summarize(comments: &[CommentSentiment], skipped_comments: usize) -> Self {
        let total_comments = comments.len();
        let positive_count = comments
            .iter()
            .filter(|comment| comment.sentiment == Sentiment::Positive)
            .count();
        let negative_count = total_comments - positive_count;

        let (positive_percentage, negative_percentage) = if total_comments == 0 {
            (0.0, 0.0)
        } else {
            let total = total_comments as f64;
            (
                round2(positive_count as f64 / total * 100.0),
                round2(negative_count as f64 / total * 100.0),
            )
        };

        Self {
            total_comments,
            positive_count,
            negative_count,
            positive_percentage,
            negative_percentage,
            skipped_comments,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(sentiment: Sentiment) -> CommentSentiment {
        CommentSentiment {
            text: "text".to_string(),
            author: "author".to_string(),
            likes: 0,
            sentiment,
        }
    }

    #[test]
    fn counts_always_add_up() {
        for positive in 0..=7 {
            let mut comments = vec![comment(Sentiment::Positive); positive];
            comments.extend(vec![comment(Sentiment::Negative); 7 - positive]);

            let stats = SentimentStats::summarize(&comments, 0);
            assert_eq!(
                stats.positive_count + stats.negative_count,
                stats.total_comments
            );
        }
    }

    #[test]
    fn percentages_are_rounded_to_two_decimals() {
        let comments = vec![
            comment(Sentiment::Positive),
            comment(Sentiment::Negative),
            comment(Sentiment::Negative),
        ];
        let stats = SentimentStats::summarize(&comments, 0);
        assert_eq!(stats.positive_percentage, 33.33);
        assert_eq!(stats.negative_percentage, 66.67);
    }

    #[test]
    fn percentages_sum_to_one_hundred_within_rounding() {
        for total in 1..=25 {
            for positive in 0..=total {
                let mut comments = vec![comment(Sentiment::Positive); positive];
                comments.extend(vec![comment(Sentiment::Negative); total - positive]);

                let stats = SentimentStats::summarize(&comments, 0);
                let sum = stats.positive_percentage + stats.negative_percentage;
                assert!(
                    (sum - 100.0).abs() <= 0.02,
                    "{positive}/{total} summed to {sum}"
                );
            }
        }
    }

    #[test]
    fn empty_input_produces_zeroes() {
        let stats = SentimentStats::summarize(&[], 3);
        assert_eq!(stats.total_comments, 0);
        assert_eq!(stats.positive_percentage, 0.0);
        assert_eq!(stats.negative_percentage, 0.0);
        assert_eq!(stats.skipped_comments, 3);
    }
}
