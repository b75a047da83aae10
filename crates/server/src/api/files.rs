//! Manual file search and playback handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use streamfind_core::{FileCandidate, PlaybackEntry, StreamLink};
use tracing::{info, warn};

use super::error::{error, from_history, from_hoster, not_configured, ApiResult};
use crate::metrics::{HOSTER_QUERIES_TOTAL, STREAMS_RESOLVED_TOTAL};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileSearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub ident: String,
    pub name: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A stream link plus where to resume, if the file was left unfinished.
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    #[serde(flatten)]
    pub link: StreamLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    #[serde(default)]
    pub position_secs: u64,
    #[serde(default)]
    pub finished: bool,
}

/// GET /api/v1/files/search
///
/// Raw hoster search, unfiltered. The query is added to the search history.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileSearchParams>,
) -> ApiResult<Vec<FileCandidate>> {
    let Some(hoster) = state.hoster() else {
        return Err(not_configured("File hoster"));
    };

    let query = params.query.trim();
    if query.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "query must not be empty"));
    }

    if let Err(e) = state.history().add_search(query) {
        warn!(error = %e, "Failed to record search history");
    }

    HOSTER_QUERIES_TOTAL.with_label_values(&[hoster.name()]).inc();
    hoster.search(query).await.map(Json).map_err(from_hoster)
}

/// POST /api/v1/play
///
/// Resolve a stream link and move the file to the front of the playback
/// history, keeping an unfinished resume position.
pub async fn play(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayRequest>,
) -> ApiResult<PlayResponse> {
    let Some(hoster) = state.hoster() else {
        return Err(not_configured("File hoster"));
    };
    if req.ident.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "ident must not be empty"));
    }

    let link = match hoster.resolve_stream(&req.ident).await {
        Ok(link) => {
            STREAMS_RESOLVED_TOTAL
                .with_label_values(&[hoster.name(), "ok"])
                .inc();
            link
        }
        Err(e) => {
            STREAMS_RESOLVED_TOTAL
                .with_label_values(&[hoster.name(), "error"])
                .inc();
            return Err(from_hoster(e));
        }
    };

    let resume_secs = match state.history().playback() {
        Ok(history) => history
            .into_iter()
            .find(|e| e.ident == req.ident && !e.finished)
            .and_then(|e| e.resume_secs),
        Err(e) => {
            warn!(error = %e, "Failed to read playback history");
            None
        }
    };

    let mut entry = PlaybackEntry::new(req.ident, req.name, req.size_bytes.unwrap_or(0))
        .with_title(req.title);
    entry.resume_secs = resume_secs;

    info!(ident = %entry.ident, name = %entry.name, resume_secs, "Playing file");
    if let Err(e) = state.history().add_playback(entry) {
        warn!(error = %e, "Failed to record playback history");
    }

    Ok(Json(PlayResponse { link, resume_secs }))
}

/// POST /api/v1/play/{ident}/progress
pub async fn progress(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Json(req): Json<ProgressRequest>,
) -> ApiResult<PlaybackEntry> {
    let result = if req.finished {
        state.history().mark_finished(&ident)
    } else {
        state.history().record_progress(&ident, req.position_secs)
    };
    result.map(Json).map_err(from_history)
}
