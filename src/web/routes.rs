use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOutcome;
use crate::error::AnalysisError;
use crate::sentiment::{ModelInfo, Sentiment};
use crate::storage::{AnalysisSummary, StoredAnalysis};
use crate::youtube::{ApiStatus, VideoSearchResult};

use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub video_url: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Json<AnalysisOutcome>, AnalysisError> {
    let outcome = state.analyzer.analyze(&form.video_url).await?;
    Ok(Json(outcome))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StoredAnalysis>, AnalysisError> {
    match state.store.get(id).await.map_err(AnalysisError::Internal)? {
        Some(analysis) => Ok(Json(analysis)),
        None => Err(AnalysisError::NotFound(format!("analysis {id} not found"))),
    }
}

pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisSummary>>, AnalysisError> {
    let summaries = state.store.list().await.map_err(AnalysisError::Internal)?;
    Ok(Json(summaries))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub max_results: usize,
}

fn default_search_limit() -> usize {
    10
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<VideoSearchResult>>, AnalysisError> {
    let videos = state
        .youtube
        .search_videos(&query.q, query.max_results)
        .await?;
    Ok(Json(videos))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub model: ModelInfo,
    pub model_check: Option<ModelCheck>,
    pub youtube: ApiStatus,
}

/// Canary prediction proving the loaded pipeline answers end to end.
#[derive(Debug, Serialize)]
pub struct ModelCheck {
    pub sentiment: Sentiment,
    pub confidence: f64,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let model_check = state
        .classifier
        .classify_with_confidence("thank you, great video")
        .map(|(sentiment, confidence)| ModelCheck {
            sentiment,
            confidence,
        });

    Json(StatusResponse {
        model: state.classifier.info(),
        model_check,
        youtube: state.youtube.api_status().await,
    })
}
