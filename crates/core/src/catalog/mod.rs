//! Metadata catalog integration.
//!
//! Turns a free-text title query into movie and TV records, and lists the
//! seasons and episodes of a show. The records feed
//! [`MediaTarget`](crate::matching::MediaTarget) construction.

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the metadata catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or invalid API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// A metadata catalog.
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Search movies and TV shows. Zero results is not an error.
    async fn search(&self, query: &str) -> Result<Vec<MetadataRecord>, CatalogError>;

    /// List the seasons of a TV show.
    async fn seasons(&self, tv_id: u32) -> Result<Vec<SeasonSummary>, CatalogError>;

    /// List the episodes of one season.
    async fn episodes(&self, tv_id: u32, season: u32)
        -> Result<Vec<EpisodeSummary>, CatalogError>;
}
