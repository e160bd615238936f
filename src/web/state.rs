use std::sync::Arc;

use crate::analysis::CommentAnalyzer;
use crate::sentiment::SentimentClassifier;
use crate::storage::AnalysisStore;
use crate::youtube::YouTubeClient;

/// Shared handles for the request handlers. Everything long-lived is
/// constructed once in `main` and cloned in, never reached through globals.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<CommentAnalyzer>,
    pub classifier: Arc<SentimentClassifier>,
    pub youtube: YouTubeClient,
    pub store: AnalysisStore,
}
