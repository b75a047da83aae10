//! Mock metadata catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, EpisodeSummary, MetadataCatalog, MetadataRecord, SeasonSummary};

/// Mock implementation of the MetadataCatalog trait.
///
/// Search matches records whose title or original title contains the query
/// (case-insensitive). Seasons and episodes are served from what was added.
pub struct MockCatalog {
    records: Arc<RwLock<Vec<MetadataRecord>>>,
    seasons: Arc<RwLock<HashMap<u32, Vec<SeasonSummary>>>>,
    episodes: Arc<RwLock<HashMap<(u32, u32), Vec<EpisodeSummary>>>>,
    queries: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl std::fmt::Debug for MockCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalog").finish_non_exhaustive()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            seasons: Arc::new(RwLock::new(HashMap::new())),
            episodes: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn add_record(&self, record: MetadataRecord) {
        self.records.write().await.push(record);
    }

    pub async fn set_seasons(&self, tv_id: u32, seasons: Vec<SeasonSummary>) {
        self.seasons.write().await.insert(tv_id, seasons);
    }

    pub async fn set_episodes(&self, tv_id: u32, season: u32, episodes: Vec<EpisodeSummary>) {
        self.episodes.write().await.insert((tv_id, season), episodes);
    }

    /// Configure the next call to fail.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Search queries received so far.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MetadataCatalog for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<MetadataRecord>, CatalogError> {
        self.queries.write().await.push(query.to_string());
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let needle = query.to_lowercase();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r
                        .original_title
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn seasons(&self, tv_id: u32) -> Result<Vec<SeasonSummary>, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.seasons
            .read()
            .await
            .get(&tv_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("TV series {}", tv_id)))
    }

    async fn episodes(
        &self,
        tv_id: u32,
        season: u32,
    ) -> Result<Vec<EpisodeSummary>, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.episodes
            .read()
            .await
            .get(&(tv_id, season))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("TV series {} season {}", tv_id, season)))
    }
}
