use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, ProviderError};
use crate::sentiment::{Sentiment, SentimentClassifier};
use crate::storage::AnalysisStore;
use crate::youtube::{extract_video_id, YouTubeClient};

use super::report::{AnalysisReport, CommentSentiment, SentimentStats};

/// A completed analysis together with its storage id.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub id: i64,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Runs one end-to-end analysis: URL → metadata → comments → sentiment →
/// stored report. Fully sequential within a request; the only shared state
/// is the read-only classifier behind the `Arc`.
pub struct CommentAnalyzer {
    youtube: YouTubeClient,
    classifier: Arc<SentimentClassifier>,
    store: AnalysisStore,
    max_comments: usize,
}

impl CommentAnalyzer {
    pub fn new(
        youtube: YouTubeClient,
        classifier: Arc<SentimentClassifier>,
        store: AnalysisStore,
        max_comments: usize,
    ) -> Self {
        Self {
            youtube,
            classifier,
            store,
            max_comments,
        }
    }

    pub async fn analyze(&self, video_url: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| AnalysisError::InvalidInput(video_url.to_string()))?;

        let video_info = match self.youtube.get_video_info(video_id).await {
            Ok(info) => info,
            Err(ProviderError::VideoNotFound) => {
                return Err(AnalysisError::NotFound(format!(
                    "video {video_id} not found"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let comments = self
            .youtube
            .get_video_comments(video_id, self.max_comments)
            .await?;
        if comments.is_empty() {
            return Err(AnalysisError::NotFound(format!(
                "no comments found for video {video_id}"
            )));
        }

        if !self.classifier.is_loaded() {
            return Err(AnalysisError::ModelUnavailable);
        }

        let texts: Vec<String> = comments.iter().map(|comment| comment.text.clone()).collect();
        let sentiments = self.classify_all(&texts);

        let mut classified = Vec::with_capacity(comments.len());
        let mut skipped = 0usize;
        for (comment, sentiment) in comments.iter().zip(sentiments) {
            match sentiment {
                Some(sentiment) => classified.push(CommentSentiment {
                    text: comment.text.clone(),
                    author: comment.author.clone(),
                    likes: comment.likes,
                    sentiment,
                }),
                None => {
                    skipped += 1;
                    warn!("Skipping comment {}: classification failed", comment.id);
                }
            }
        }

        if classified.is_empty() {
            return Err(AnalysisError::Classification(format!(
                "all {} comments failed classification",
                comments.len()
            )));
        }

        let statistics = SentimentStats::summarize(&classified, skipped);
        info!(
            "Analyzed video {video_id}: {} comments, {} positive, {} negative, {} skipped",
            statistics.total_comments,
            statistics.positive_count,
            statistics.negative_count,
            skipped
        );

        let report = AnalysisReport {
            video_info,
            statistics,
            comments: classified,
        };
        let id = self
            .store
            .insert(&report)
            .await
            .map_err(AnalysisError::Internal)?;

        Ok(AnalysisOutcome { id, report })
    }

    /// One batched prediction for the whole request; if that fails the
    /// comments are retried one by one so a single bad prediction only
    /// skips its own comment instead of nulling the response.
    fn classify_all(&self, texts: &[String]) -> Vec<Option<Sentiment>> {
        if let Some(sentiments) = self.classifier.classify_batch(texts) {
            return sentiments.into_iter().map(Some).collect();
        }

        warn!("Batch classification failed; classifying comments individually");
        texts
            .iter()
            .map(|text| {
                let sentiment = self.classifier.classify(text);
                if let Some(sentiment) = &sentiment {
                    debug!("Recovered individual classification: {sentiment}");
                }
                sentiment
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::config::YouTubeConfig;
    use crate::sentiment::pipeline::sample_pipeline;

    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock serves");
        });
        format!("http://{addr}")
    }

    fn test_config(base_url: String) -> YouTubeConfig {
        YouTubeConfig {
            base_url,
            page_size: 100,
            max_comments: 100,
            timeout_secs: 5,
            quota_retries: 0,
            retry_backoff_ms: 1,
            api_key: Some("test-key".to_string()),
        }
    }

    async fn analyzer_against(base_url: String) -> CommentAnalyzer {
        let youtube = YouTubeClient::new(&test_config(base_url));
        let classifier = Arc::new(SentimentClassifier::with_pipeline(Some(sample_pipeline())));
        let store = AnalysisStore::open_in_memory().await;
        CommentAnalyzer::new(youtube, classifier, store, 100)
    }

    async fn video_payload() -> Json<serde_json::Value> {
        Json(json!({
            "items": [{
                "snippet": {
                    "title": "Test video",
                    "description": "about things",
                    "channelTitle": "Test channel",
                    "publishedAt": "2024-01-01T00:00:00Z"
                },
                "statistics": { "viewCount": "1000", "likeCount": "10", "commentCount": "2" }
            }]
        }))
    }

    #[tokio::test]
    async fn analyzes_fetched_comments_and_persists_the_report() {
        let router = Router::new()
            .route("/videos", get(video_payload))
            .route(
                "/commentThreads",
                get(|| async {
                    Json(json!({
                        "items": [
                            {
                                "id": "c1",
                                "snippet": {
                                    "topLevelComment": { "snippet": {
                                        "textDisplay": "I <b>love</b> this great video",
                                        "authorDisplayName": "fan",
                                        "likeCount": 5
                                    } },
                                    "totalReplyCount": 0
                                }
                            },
                            {
                                "id": "c2",
                                "snippet": {
                                    "topLevelComment": { "snippet": {
                                        "textDisplay": "I hate this awful video",
                                        "authorDisplayName": "critic",
                                        "likeCount": 1
                                    } },
                                    "totalReplyCount": 0
                                }
                            }
                        ]
                    }))
                }),
            );
        let base_url = spawn_mock(router).await;
        let analyzer = analyzer_against(base_url).await;

        let outcome = analyzer
            .analyze("https://www.youtube.com/watch?v=abc123")
            .await
            .expect("analysis succeeds");

        let stats = &outcome.report.statistics;
        assert_eq!(stats.total_comments, 2);
        assert_eq!(stats.positive_count, 1);
        assert_eq!(stats.negative_count, 1);
        assert_eq!(stats.positive_percentage, 50.0);
        assert_eq!(stats.skipped_comments, 0);
        assert_eq!(outcome.report.video_info.title, "Test video");

        let stored = analyzer
            .store
            .get(outcome.id)
            .await
            .expect("lookup succeeds")
            .expect("report was persisted");
        assert_eq!(stored.summary.video_id, "abc123");
        assert_eq!(stored.summary.total_comments, 2);
        assert_eq!(stored.results.statistics.positive_count, 1);
    }

    #[tokio::test]
    async fn unrecognized_url_is_invalid_input() {
        let analyzer = analyzer_against("http://127.0.0.1:9".to_string()).await;
        let err = analyzer
            .analyze("https://example.com/notyoutube")
            .await
            .expect_err("URL should be rejected");
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn zero_comments_maps_to_not_found() {
        let router = Router::new()
            .route("/videos", get(video_payload))
            .route(
                "/commentThreads",
                get(|| async { Json(json!({ "items": [] })) }),
            );
        let base_url = spawn_mock(router).await;
        let analyzer = analyzer_against(base_url).await;

        let err = analyzer
            .analyze("https://youtu.be/abc123")
            .await
            .expect_err("no comments should fail");
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[tokio::test]
    async fn disabled_comments_also_map_to_not_found() {
        let router = Router::new()
            .route("/videos", get(video_payload))
            .route(
                "/commentThreads",
                get(|| async {
                    (
                        StatusCode::FORBIDDEN,
                        Json(json!({
                            "error": {
                                "code": 403,
                                "message": "has disabled comments",
                                "errors": [{ "reason": "commentsDisabled" }]
                            }
                        })),
                    )
                }),
            );
        let base_url = spawn_mock(router).await;
        let analyzer = analyzer_against(base_url).await;

        let err = analyzer
            .analyze("https://youtu.be/abc123")
            .await
            .expect_err("disabled comments leave nothing to analyze");
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[tokio::test]
    async fn quota_exhaustion_surfaces_as_a_provider_error() {
        let router = Router::new()
            .route("/videos", get(video_payload))
            .route(
                "/commentThreads",
                get(|| async {
                    (
                        StatusCode::FORBIDDEN,
                        Json(json!({
                            "error": {
                                "code": 403,
                                "message": "quota exhausted",
                                "errors": [{ "reason": "quotaExceeded" }]
                            }
                        })),
                    )
                }),
            );
        let base_url = spawn_mock(router).await;
        let analyzer = analyzer_against(base_url).await;

        let err = analyzer
            .analyze("https://youtu.be/abc123")
            .await
            .expect_err("quota exhaustion should fail the analysis");
        assert!(matches!(
            err,
            AnalysisError::Provider(ProviderError::QuotaExceeded)
        ));
    }

    #[tokio::test]
    async fn missing_video_maps_to_not_found() {
        let router = Router::new().route("/videos", get(|| async { Json(json!({ "items": [] })) }));
        let base_url = spawn_mock(router).await;
        let analyzer = analyzer_against(base_url).await;

        let err = analyzer
            .analyze("https://youtu.be/missing1")
            .await
            .expect_err("unknown video should fail");
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[tokio::test]
    async fn unloaded_model_aborts_before_classification() {
        let router = Router::new()
            .route("/videos", get(video_payload))
            .route(
                "/commentThreads",
                get(|| async {
                    Json(json!({
                        "items": [{
                            "id": "c1",
                            "snippet": {
                                "topLevelComment": { "snippet": { "textDisplay": "nice" } },
                                "totalReplyCount": 0
                            }
                        }]
                    }))
                }),
            );
        let base_url = spawn_mock(router).await;

        let youtube = YouTubeClient::new(&test_config(base_url));
        let classifier = Arc::new(SentimentClassifier::with_pipeline(None));
        let store = AnalysisStore::open_in_memory().await;
        let analyzer = CommentAnalyzer::new(youtube, classifier, store, 100);

        let err = analyzer
            .analyze("https://youtu.be/abc123")
            .await
            .expect_err("unloaded model cannot analyze");
        assert!(matches!(err, AnalysisError::ModelUnavailable));
    }
}
