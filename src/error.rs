use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the YouTube Data API boundary. `CommentsDisabled` never
/// escapes the client (a disabled video simply has no comments); the rest
/// surface through `AnalysisError::Provider`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("YouTube API key not configured")]
    NotConfigured,
    #[error("video not found")]
    VideoNotFound,
    #[error("comments are disabled for this video")]
    CommentsDisabled,
    #[error("YouTube API quota exceeded")]
    QuotaExceeded,
    #[error("{0}")]
    Other(String),
}

/// Everything an analysis request can fail with, mapped onto HTTP statuses
/// by the `IntoResponse` impl below.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("could not extract a video ID from URL: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("sentiment model is not available")]
    ModelUnavailable,
    #[error("{0}")]
    Classification(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalysisError {
    fn status(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::Provider(ProviderError::QuotaExceeded) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AnalysisError::Provider(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::ModelUnavailable
            | AnalysisError::Classification(_)
            | AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
