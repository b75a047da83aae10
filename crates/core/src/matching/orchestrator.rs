//! End-to-end candidate resolution.
//!
//! Walks the query chain for a target against an injected [`FileHoster`],
//! one query at a time, and stops at the first query that yields usable
//! results. A failing search is logged and treated as an empty attempt.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::hoster::FileHoster;
use crate::matching::episode_filter::filter_episode_results;
use crate::matching::query_builder::QueryBuilder;
use crate::matching::scorer::{RelevanceScorer, ScoringWeights};
use crate::matching::types::{FileCandidate, MediaKind, MediaTarget, ResolveResult, ScoredCandidate};
use crate::matching::MatchError;

/// Outcome of [`MatchOrchestrator::resolve`], tagged by target kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Movie(ResolveResult<ScoredCandidate>),
    Episode(ResolveResult<FileCandidate>),
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        match self {
            Resolution::Movie(r) => r.is_empty(),
            Resolution::Episode(r) => r.is_empty(),
        }
    }

    pub fn queries_tried(&self) -> &[String] {
        match self {
            Resolution::Movie(r) => &r.queries_tried,
            Resolution::Episode(r) => &r.queries_tried,
        }
    }
}

/// Composes query building, hoster search, filtering and scoring.
#[derive(Debug, Clone, Default)]
pub struct MatchOrchestrator {
    queries: QueryBuilder,
    scorer: RelevanceScorer,
}

impl MatchOrchestrator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            queries: QueryBuilder::new(),
            scorer: RelevanceScorer::new(weights),
        }
    }

    /// Resolve any target.
    pub async fn resolve(
        &self,
        target: &MediaTarget,
        hoster: &dyn FileHoster,
    ) -> Result<Resolution, MatchError> {
        match target.kind {
            MediaKind::Movie => Ok(Resolution::Movie(self.resolve_movie(target, hoster).await?)),
            MediaKind::Episode { .. } => Ok(Resolution::Episode(
                self.resolve_episode(target, hoster).await?,
            )),
        }
    }

    /// Find files for one episode of a show.
    ///
    /// Each generated query is searched and its hits filtered by show title
    /// and episode code. The first non-empty filtered set is returned;
    /// later queries are never issued.
    pub async fn resolve_episode(
        &self,
        target: &MediaTarget,
        hoster: &dyn FileHoster,
    ) -> Result<ResolveResult<FileCandidate>, MatchError> {
        let MediaKind::Episode { season, episode, .. } = target.kind else {
            return Err(MatchError::InvalidTarget(format!(
                "'{}' is not an episode",
                target.title
            )));
        };

        let start = Instant::now();
        let attempts = self.queries.build_queries(target);
        let mut queries_tried = Vec::new();

        for attempt in attempts {
            queries_tried.push(attempt.query.clone());
            let raw = search(hoster, &attempt.query).await;
            let raw_count = raw.len();

            let filtered = filter_episode_results(raw, &target.title, season, episode);
            debug!(
                rank = attempt.rank,
                query = %attempt.query,
                raw = raw_count,
                kept = filtered.len(),
                "Episode query attempt"
            );

            if !filtered.is_empty() {
                info!(
                    show = %target.title,
                    season,
                    episode,
                    query = %attempt.query,
                    matches = filtered.len(),
                    "Episode resolved"
                );
                return Ok(ResolveResult {
                    candidates: filtered,
                    queries_tried,
                    matched_query: Some(attempt.query),
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
        }

        info!(
            show = %target.title,
            season,
            episode,
            attempts = queries_tried.len(),
            "No files found for episode"
        );
        Ok(ResolveResult {
            candidates: Vec::new(),
            queries_tried,
            matched_query: None,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Find and rank files for a movie.
    ///
    /// Stops at the first query with any raw hits and scores that set only,
    /// so the result may still be empty when scoring drops every hit. Hits
    /// are scored against the title the matching query was built from.
    pub async fn resolve_movie(
        &self,
        target: &MediaTarget,
        hoster: &dyn FileHoster,
    ) -> Result<ResolveResult<ScoredCandidate>, MatchError> {
        if target.is_episode() {
            return Err(MatchError::InvalidTarget(format!(
                "'{}' is an episode, not a movie",
                target.title
            )));
        }

        let start = Instant::now();
        let mut queries_tried = Vec::new();

        for attempt in self.queries.build_queries(target) {
            queries_tried.push(attempt.query.clone());
            let raw = search(hoster, &attempt.query).await;
            debug!(rank = attempt.rank, query = %attempt.query, raw = raw.len(), "Movie query attempt");

            if raw.is_empty() {
                continue;
            }

            let ranked = self.scorer.score_and_rank(raw, &attempt.title, target.year);
            info!(
                title = %attempt.title,
                query = %attempt.query,
                kept = ranked.len(),
                best = ranked.first().map(|c| c.score),
                "Movie candidates ranked"
            );
            return Ok(ResolveResult {
                candidates: ranked,
                queries_tried,
                matched_query: Some(attempt.query),
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        info!(title = %target.title, attempts = queries_tried.len(), "No files found for movie");
        Ok(ResolveResult {
            candidates: Vec::new(),
            queries_tried,
            matched_query: None,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// One hoster search; failures count as no results.
async fn search(hoster: &dyn FileHoster, query: &str) -> Vec<FileCandidate> {
    match hoster.search(query).await {
        Ok(files) => files,
        Err(e) => {
            warn!(hoster = hoster.name(), query, error = %e, "Hoster search failed");
            Vec::new()
        }
    }
}
