use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{catalog, files, handlers, history, middleware::metrics_middleware, resolve};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Metadata catalog
        .route("/catalog/search", get(catalog::search))
        .route("/catalog/tv/{id}/seasons", get(catalog::seasons))
        .route(
            "/catalog/tv/{id}/seasons/{season}/episodes",
            get(catalog::episodes),
        )
        // Candidate resolution
        .route("/resolve", post(resolve::resolve_target))
        .route("/resolve/movie", post(resolve::resolve_movie))
        .route("/resolve/episode", post(resolve::resolve_episode))
        // Files and playback
        .route("/files/search", get(files::search))
        .route("/play", post(files::play))
        .route("/play/{ident}/progress", post(files::progress))
        // History
        .route("/history/playback", get(history::playback))
        .route("/history/searches", get(history::searches))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
