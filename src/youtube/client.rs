use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::YouTubeConfig;
use crate::error::ProviderError;

use super::types::{ApiStatus, Comment, VideoInfo, VideoSearchResult};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[a-zA-Z]+;").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Well-known public video used as a cheap liveness probe.
const PROBE_VIDEO_ID: &str = "dQw4w9WgXcQ";

/// Client for the YouTube Data API v3. Constructed once and cloned into
/// request handlers; without a credential it stays up but every call
/// returns `ProviderError::NotConfigured`.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: usize,
    timeout: Duration,
    quota_retries: u32,
    retry_backoff: Duration,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Self {
        if config.api_key.is_none() {
            warn!("YOUTUBE_API_KEY not set; every YouTube API call will fail until a key is provisioned");
        }

        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
            timeout: Duration::from_secs(config.timeout_secs),
            quota_retries: config.quota_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or(ProviderError::NotConfigured)
    }

    /// Fetch a video's metadata. One external call per analysis.
    pub async fn get_video_info(&self, video_id: &str) -> Result<VideoInfo, ProviderError> {
        let key = self.key()?;
        let url = format!("{}/videos", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("part", "snippet,statistics"), ("id", video_id), ("key", key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Other(format!("video request failed: {e}")))?;
        let response = check_response(response).await?;

        let payload: VideoListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Other(format!("malformed video response: {e}")))?;

        match payload.items.into_iter().next() {
            Some(item) => Ok(item.into_video_info(video_id)),
            None => Err(ProviderError::VideoNotFound),
        }
    }

    /// Fetch up to `max_results` relevance-ordered top-level comments,
    /// following the provider's continuation cursor. Comments that are empty
    /// after markup stripping are discarded and do not count toward the cap.
    ///
    /// Disabled comments are not an error: the video simply has none.
    pub async fn get_video_comments(
        &self,
        video_id: &str,
        max_results: usize,
    ) -> Result<Vec<Comment>, ProviderError> {
        let key = self.key()?;
        let mut comments: Vec<Comment> = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max_results {
            let page_size = self.page_size.min(max_results - comments.len());
            let page = match self
                .fetch_comment_page(key, video_id, page_size, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(ProviderError::CommentsDisabled) => {
                    warn!("Comments are disabled for video {video_id}");
                    return Ok(Vec::new());
                }
                Err(ProviderError::QuotaExceeded) => {
                    error!("YouTube API quota exceeded while fetching comments for {video_id}");
                    return Err(ProviderError::QuotaExceeded);
                }
                Err(e) => {
                    error!("Failed to fetch comments for {video_id}: {e}");
                    return Err(e);
                }
            };

            for item in page.items {
                if let Some(comment) = item.into_comment() {
                    comments.push(comment);
                    if comments.len() >= max_results {
                        break;
                    }
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        info!("Fetched {} comments from video {video_id}", comments.len());
        Ok(comments)
    }

    /// One comment page, retried with bounded exponential backoff while the
    /// provider reports quota exhaustion.
    async fn fetch_comment_page(
        &self,
        key: &str,
        video_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<CommentThreadListResponse, ProviderError> {
        let mut delay = self.retry_backoff;
        let mut attempt = 0;

        loop {
            let result = self
                .request_comment_page(key, video_id, page_size, page_token)
                .await;

            match result {
                Err(ProviderError::QuotaExceeded) if attempt < self.quota_retries => {
                    attempt += 1;
                    warn!(
                        "Quota exceeded, retrying in {:?} (attempt {attempt}/{})",
                        delay, self.quota_retries
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                other => return other,
            }
        }
    }

    async fn request_comment_page(
        &self,
        key: &str,
        video_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<CommentThreadListResponse, ProviderError> {
        let url = format!("{}/commentThreads", self.base_url);
        let page_size = page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", page_size.as_str()),
            ("order", "relevance"),
            ("key", key),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Other(format!("comment request failed: {e}")))?;
        let response = check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ProviderError::Other(format!("malformed comment response: {e}")))
    }

    /// Relevance-ordered video search.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoSearchResult>, ProviderError> {
        let key = self.key()?;
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
                ("key", key),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Other(format!("search request failed: {e}")))?;
        let response = check_response(response).await?;

        let payload: SearchListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Other(format!("malformed search response: {e}")))?;

        Ok(payload
            .items
            .into_iter()
            .filter_map(SearchItem::into_search_result)
            .collect())
    }

    /// Probe the API with a known video so the status endpoint can report
    /// whether the credential works and quota remains.
    pub async fn api_status(&self) -> ApiStatus {
        if self.api_key.is_none() {
            return ApiStatus {
                status: "API credential not configured".to_string(),
                api_key_set: false,
                quota_available: false,
            };
        }

        match self.get_video_info(PROBE_VIDEO_ID).await {
            Ok(_) | Err(ProviderError::VideoNotFound) => ApiStatus {
                status: "API working".to_string(),
                api_key_set: true,
                quota_available: true,
            },
            Err(ProviderError::QuotaExceeded) => ApiStatus {
                status: "Quota exceeded".to_string(),
                api_key_set: true,
                quota_available: false,
            },
            Err(e) => ApiStatus {
                status: format!("API error: {e}"),
                api_key_set: true,
                quota_available: false,
            },
        }
    }
}

/// Classify a non-success response into the provider error taxonomy.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_api_error(status, &body))
}

fn classify_api_error(status: StatusCode, body: &str) -> ProviderError {
    let parsed: Option<ApiErrorEnvelope> = serde_json::from_str(body).ok();
    let (message, reasons) = match &parsed {
        Some(envelope) => (
            envelope.error.message.as_str(),
            envelope
                .error
                .errors
                .iter()
                .map(|item| item.reason.as_str())
                .collect::<Vec<_>>(),
        ),
        None => (body, Vec::new()),
    };

    let mentions = |needle: &str| {
        reasons.iter().any(|reason| *reason == needle) || message.contains(needle)
    };

    if mentions("commentsDisabled") {
        ProviderError::CommentsDisabled
    } else if mentions("quotaExceeded") || mentions("rateLimitExceeded") {
        ProviderError::QuotaExceeded
    } else {
        ProviderError::Other(format!("{status}: {message}"))
    }
}

/// Drop the markup the API embeds in `textDisplay` payloads.
fn strip_html(text: &str) -> String {
    let text = TAG.replace_all(text, "");
    let text = ENTITY.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// First `limit` characters plus an ellipsis marker; empty stays empty.
fn truncate_text(text: &str, limit: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let prefix: String = text.chars().take(limit).collect();
    format!("{prefix}...")
}

fn parse_count(raw: Option<String>) -> u64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(0)
}

// Wire shapes for the slices of the Data API v3 this service consumes.

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    reason: String,
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    statistics: Option<VideoStatistics>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

impl VideoItem {
    fn into_video_info(self, video_id: &str) -> VideoInfo {
        let snippet = self.snippet;
        let statistics = self.statistics.unwrap_or_default();
        let mut tags = snippet.tags.unwrap_or_default();
        tags.truncate(5);

        VideoInfo {
            id: video_id.to_string(),
            title: snippet.title.unwrap_or_else(|| "Unknown Title".to_string()),
            description: truncate_text(snippet.description.as_deref().unwrap_or(""), 200),
            channel_title: snippet
                .channel_title
                .unwrap_or_else(|| "Unknown Channel".to_string()),
            published_at: snippet
                .published_at
                .unwrap_or_else(|| "Unknown Date".to_string()),
            view_count: parse_count(statistics.view_count),
            like_count: parse_count(statistics.like_count),
            comment_count: parse_count(statistics.comment_count),
            thumbnail: snippet
                .thumbnails
                .and_then(|thumbnails| thumbnails.medium)
                .and_then(|medium| medium.url)
                .unwrap_or_default(),
            tags,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct CommentThread {
    id: String,
    snippet: CommentThreadSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
    #[serde(default)]
    total_reply_count: u64,
}

#[derive(Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
    author_display_name: Option<String>,
    author_channel_url: Option<String>,
    #[serde(default)]
    like_count: u64,
    published_at: Option<String>,
    updated_at: Option<String>,
}

impl CommentThread {
    /// `None` when nothing is left after markup stripping.
    fn into_comment(self) -> Option<Comment> {
        let snippet = self.snippet.top_level_comment.snippet;
        let text = strip_html(&snippet.text_display);
        if text.is_empty() {
            return None;
        }

        Some(Comment {
            id: self.id,
            text,
            author: snippet
                .author_display_name
                .unwrap_or_else(|| "Anonymous".to_string()),
            author_channel: snippet.author_channel_url.unwrap_or_default(),
            likes: snippet.like_count,
            published_at: snippet.published_at.unwrap_or_default(),
            updated_at: snippet.updated_at.unwrap_or_default(),
            total_reply_count: self.snippet.total_reply_count,
        })
    }
}

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: VideoSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

impl SearchItem {
    fn into_search_result(self) -> Option<VideoSearchResult> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet;
        Some(VideoSearchResult {
            id: video_id,
            title: snippet.title.unwrap_or_else(|| "Unknown Title".to_string()),
            description: truncate_text(snippet.description.as_deref().unwrap_or(""), 100),
            channel_title: snippet
                .channel_title
                .unwrap_or_else(|| "Unknown Channel".to_string()),
            published_at: snippet
                .published_at
                .unwrap_or_else(|| "Unknown Date".to_string()),
            thumbnail: snippet
                .thumbnails
                .and_then(|thumbnails| thumbnails.medium)
                .and_then(|medium| medium.url)
                .unwrap_or_default(),
        })
    }
}
