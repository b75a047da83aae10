//! Metadata catalog handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use streamfind_core::{EpisodeSummary, MetadataRecord, SeasonSummary};
use tracing::warn;

use super::error::{error, from_catalog, not_configured, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogSearchParams {
    pub query: String,
}

/// GET /api/v1/catalog/search
///
/// Search movies and TV shows. The query is added to the search history.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogSearchParams>,
) -> ApiResult<Vec<MetadataRecord>> {
    let Some(catalog) = state.catalog() else {
        return Err(not_configured("Metadata catalog"));
    };

    let query = params.query.trim();
    if query.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "query must not be empty"));
    }

    if let Err(e) = state.history().add_search(query) {
        warn!(error = %e, "Failed to record search history");
    }

    catalog.search(query).await.map(Json).map_err(from_catalog)
}

/// GET /api/v1/catalog/tv/{id}/seasons
pub async fn seasons(
    State(state): State<Arc<AppState>>,
    Path(tv_id): Path<u32>,
) -> ApiResult<Vec<SeasonSummary>> {
    let Some(catalog) = state.catalog() else {
        return Err(not_configured("Metadata catalog"));
    };

    catalog.seasons(tv_id).await.map(Json).map_err(from_catalog)
}

/// GET /api/v1/catalog/tv/{id}/seasons/{season}/episodes
pub async fn episodes(
    State(state): State<Arc<AppState>>,
    Path((tv_id, season)): Path<(u32, u32)>,
) -> ApiResult<Vec<EpisodeSummary>> {
    let Some(catalog) = state.catalog() else {
        return Err(not_configured("Metadata catalog"));
    };

    catalog
        .episodes(tv_id, season)
        .await
        .map(Json)
        .map_err(from_catalog)
}
