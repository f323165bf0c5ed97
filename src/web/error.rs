//! HTTP error responses

use crate::search::SearchError;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every store-side failure
pub const SEARCH_FAILED: &str = "Search failed";

/// Message returned for an unknown `type` value
pub const INVALID_TYPE_FILTER: &str = "Invalid type filter";

/// Message returned for a query string that does not decode
pub const INVALID_PARAMS: &str = "Invalid query parameters";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("invalid query string: {0}")]
    InvalidParams(#[from] QueryRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidParams(rejection) => {
                tracing::debug!("Rejected query string: {}", rejection);
                (StatusCode::BAD_REQUEST, INVALID_PARAMS)
            }
            ApiError::Search(err) if err.is_client_error() => {
                tracing::debug!("Rejected search request: {}", err);
                (StatusCode::BAD_REQUEST, INVALID_TYPE_FILTER)
            }
            ApiError::Search(err) => {
                // The cause stays in the logs, callers get a fixed message
                tracing::error!("Search failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, SEARCH_FAILED)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
