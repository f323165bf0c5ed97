//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::metrics::MetricsSnapshot;
use crate::search::SearchResponse;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Query parameters for search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Entity kind filter: all, user or channel
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `GET /api/search`
///
/// A query string that does not decode, such as a repeated `q`, is answered
/// with a JSON 400 like every other error.
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let response = state
        .search
        .search(params.q.as_deref(), params.kind.as_deref())
        .await?;

    Ok(Json(response))
}

/// `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics().snapshot())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}
