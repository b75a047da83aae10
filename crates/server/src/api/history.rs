use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use streamfind_core::{PlaybackEntry, SearchEntry};

use super::error::{from_history, ApiResult};
use crate::state::AppState;

/// GET /api/v1/history/playback
pub async fn playback(State(state): State<Arc<AppState>>) -> ApiResult<Vec<PlaybackEntry>> {
    state.history().playback().map(Json).map_err(from_history)
}

/// GET /api/v1/history/searches
pub async fn searches(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SearchEntry>> {
    state.history().searches().map(Json).map_err(from_history)
}
