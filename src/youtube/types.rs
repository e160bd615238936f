use serde::{Deserialize, Serialize};

/// Video metadata, fetched once per analysis. Read-only after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub thumbnail: String,
    pub tags: Vec<String>,
}

/// A top-level comment with the platform's markup already stripped.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub author_channel: String,
    pub likes: u64,
    pub published_at: String,
    pub updated_at: String,
    pub total_reply_count: u64,
}

/// One hit from the provider's video search.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnail: String,
}

/// Snapshot of whether the provider API is usable right now.
#[derive(Debug, Clone, Serialize)]
pub struct ApiStatus {
    pub status: String,
    pub api_key_set: bool,
    pub quota_available: bool,
}
