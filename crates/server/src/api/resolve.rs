//! Candidate resolution handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use streamfind_core::{
    FileCandidate, MatchError, MediaTarget, Resolution, ResolveResult, ScoredCandidate,
};

use super::error::{from_match, not_configured, ApiError, ApiResult};
use crate::metrics::{HOSTER_QUERIES_TOTAL, RESOLVE_REQUESTS_TOTAL};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveMovieRequest {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveEpisodeRequest {
    pub show_title: String,
    pub season: u32,
    pub episode: u32,
    #[serde(default)]
    pub episode_name: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
}

/// POST /api/v1/resolve/movie
pub async fn resolve_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveMovieRequest>,
) -> ApiResult<ResolveResult<ScoredCandidate>> {
    let target = MediaTarget::movie(req.title, req.original_title, req.year);
    match resolve(&state, &target).await? {
        Resolution::Movie(result) => Ok(Json(result)),
        Resolution::Episode(_) => Err(from_match(MatchError::InvalidTarget(
            "expected a movie resolution".to_string(),
        ))),
    }
}

/// POST /api/v1/resolve/episode
pub async fn resolve_episode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveEpisodeRequest>,
) -> ApiResult<ResolveResult<FileCandidate>> {
    let target = MediaTarget::episode(
        req.show_title,
        req.season,
        req.episode,
        req.episode_name,
        req.year,
    );
    match resolve(&state, &target).await? {
        Resolution::Episode(result) => Ok(Json(result)),
        Resolution::Movie(_) => Err(from_match(MatchError::InvalidTarget(
            "expected an episode resolution".to_string(),
        ))),
    }
}

/// POST /api/v1/resolve
///
/// Resolve a target given in its tagged form (`"kind": "movie" | "episode"`).
pub async fn resolve_target(
    State(state): State<Arc<AppState>>,
    Json(target): Json<MediaTarget>,
) -> ApiResult<Resolution> {
    resolve(&state, &target).await.map(Json)
}

async fn resolve(state: &AppState, target: &MediaTarget) -> Result<Resolution, ApiError> {
    let kind = if target.is_episode() { "episode" } else { "movie" };

    let Some(hoster) = state.hoster() else {
        RESOLVE_REQUESTS_TOTAL
            .with_label_values(&[kind, "unavailable"])
            .inc();
        return Err(not_configured("File hoster"));
    };

    let resolution = match state.orchestrator().resolve(target, hoster.as_ref()).await {
        Ok(resolution) => resolution,
        Err(e) => {
            RESOLVE_REQUESTS_TOTAL
                .with_label_values(&[kind, "invalid"])
                .inc();
            return Err(from_match(e));
        }
    };

    HOSTER_QUERIES_TOTAL
        .with_label_values(&[hoster.name()])
        .inc_by(resolution.queries_tried().len() as u64);
    let outcome = if resolution.is_empty() { "empty" } else { "matched" };
    RESOLVE_REQUESTS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();

    Ok(resolution)
}
