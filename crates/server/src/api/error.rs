//! Error responses shared by the API handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use streamfind_core::{CatalogError, HistoryError, HosterError, MatchError};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// 503 for a collaborator missing from config.
pub fn not_configured(what: &str) -> ApiError {
    error(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("{} not configured", what),
    )
}

pub fn from_hoster(e: HosterError) -> ApiError {
    warn!(error = %e, "File hoster request failed");
    error(StatusCode::BAD_GATEWAY, e.to_string())
}

pub fn from_catalog(e: CatalogError) -> ApiError {
    match e {
        CatalogError::NotFound(what) => error(StatusCode::NOT_FOUND, format!("Not found: {}", what)),
        e => {
            warn!(error = %e, "Metadata catalog request failed");
            error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

pub fn from_history(e: HistoryError) -> ApiError {
    match e {
        HistoryError::NotFound(ident) => error(
            StatusCode::NOT_FOUND,
            format!("Not in playback history: {}", ident),
        ),
        e => error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

pub fn from_match(e: MatchError) -> ApiError {
    error(StatusCode::BAD_REQUEST, e.to_string())
}
