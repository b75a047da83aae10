//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{EpisodeSummary, MediaType, MetadataRecord, SeasonSummary};
use super::{CatalogError, MetadataCatalog};

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Result languages, tried in order (default: cs-CZ, en-US).
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters/backdrops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

fn default_languages() -> Vec<String> {
    vec!["cs-CZ".to_string(), "en-US".to_string()]
}

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const STILL_SIZE: &str = "w300";

/// TMDB API client.
///
/// Image paths in returned records are absolute URLs under the image base.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    languages: Vec<String>,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        let image_base_url = config
            .image_base_url
            .unwrap_or_else(|| "https://image.tmdb.org/t/p".to_string());

        let languages = if config.languages.is_empty() {
            default_languages()
        } else {
            config.languages
        };

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            languages,
            image_base_url,
        })
    }

    /// Full URL of a poster or still, e.g. `image_url("w500", "/abc.jpg")`.
    pub fn image_url(&self, size: &str, path: &str) -> String {
        format!("{}/{}{}", self.image_base_url, size, path)
    }

    /// Expand a relative TMDB image path; blank paths are dropped.
    fn expand_image(&self, size: &str, path: Option<String>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| self.image_url(size, &p))
    }

    fn expand_record(&self, mut record: MetadataRecord) -> MetadataRecord {
        record.poster_path = self.expand_image(POSTER_SIZE, record.poster_path.take());
        record.backdrop_path = self.expand_image(BACKDROP_SIZE, record.backdrop_path.take());
        record
    }

    fn primary_language(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or("en-US")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        what: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }

    /// One `/search/multi` call per configured language until one returns
    /// movie or TV results.
    async fn search_languages(&self, query: &str) -> Result<Vec<MetadataRecord>, CatalogError> {
        for language in &self.languages {
            debug!("TMDB multi search: query='{}', language={}", query, language);

            let response: MultiSearchResponse = self
                .get_json(
                    "/search/multi",
                    &[("query", query), ("language", language.as_str())],
                    "search",
                )
                .await?;

            let records: Vec<MetadataRecord> = response
                .results
                .into_iter()
                .filter_map(MultiResult::into_record)
                .map(|r| self.expand_record(r))
                .collect();

            if !records.is_empty() {
                return Ok(records);
            }
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl MetadataCatalog for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<MetadataRecord>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.search_languages(query).await?;
        if !records.is_empty() {
            return Ok(records);
        }

        // Single alias attempt: "Pat a Mat" is often listed as "Pat and Mat".
        let alias = query.replace(" a ", " and ");
        if alias != query {
            debug!("TMDB search empty, retrying with alias '{}'", alias);
            return self.search_languages(&alias).await;
        }

        Ok(Vec::new())
    }

    async fn seasons(&self, tv_id: u32) -> Result<Vec<SeasonSummary>, CatalogError> {
        debug!("TMDB get TV: id={}", tv_id);

        let details: TvDetails = self
            .get_json(
                &format!("/tv/{}", tv_id),
                &[("language", self.primary_language())],
                &format!("TV series {}", tv_id),
            )
            .await?;

        Ok(details
            .seasons
            .into_iter()
            .map(|s| {
                let mut season = SeasonSummary::from(s);
                season.poster_path = self.expand_image(POSTER_SIZE, season.poster_path.take());
                season
            })
            .collect())
    }

    async fn episodes(
        &self,
        tv_id: u32,
        season: u32,
    ) -> Result<Vec<EpisodeSummary>, CatalogError> {
        debug!("TMDB get season: series={}, season={}", tv_id, season);

        let details: SeasonDetails = self
            .get_json(
                &format!("/tv/{}/season/{}", tv_id, season),
                &[("language", self.primary_language())],
                &format!("TV series {} season {}", tv_id, season),
            )
            .await?;

        Ok(details
            .episodes
            .into_iter()
            .map(|e| {
                let mut episode = EpisodeSummary::from(e);
                episode.still_path = self.expand_image(STILL_SIZE, episode.still_path.take());
                episode
            })
            .collect())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    #[serde(default)]
    results: Vec<MultiResult>,
}

/// A `/search/multi` hit. Movies use `title`/`release_date`, TV uses
/// `name`/`first_air_date`. Any other media type (people) is skipped.
#[derive(Debug, Deserialize)]
struct MultiResult {
    id: u32,
    media_type: String,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl MultiResult {
    fn into_record(self) -> Option<MetadataRecord> {
        let (kind, title, original_title, date) = match self.media_type.as_str() {
            "movie" => (
                MediaType::Movie,
                self.title?,
                self.original_title,
                self.release_date,
            ),
            "tv" => (
                MediaType::Tv,
                self.name?,
                self.original_name,
                self.first_air_date,
            ),
            _ => return None,
        };

        Some(MetadataRecord {
            kind,
            id: self.id,
            title,
            original_title: original_title.filter(|t| !t.is_empty()),
            overview: self.overview.filter(|o| !o.is_empty()),
            date: date.filter(|d| !d.is_empty()),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TvDetails {
    #[serde(default)]
    seasons: Vec<SeasonResult>,
}

#[derive(Debug, Deserialize)]
struct SeasonResult {
    season_number: u32,
    name: Option<String>,
    episode_count: Option<u32>,
    air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonDetails {
    #[serde(default)]
    episodes: Vec<EpisodeResult>,
}

#[derive(Debug, Deserialize)]
struct EpisodeResult {
    episode_number: u32,
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    still_path: Option<String>,
    vote_average: Option<f32>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<SeasonResult> for SeasonSummary {
    fn from(s: SeasonResult) -> Self {
        Self {
            season_number: s.season_number,
            name: s
                .name
                .unwrap_or_else(|| format!("Season {}", s.season_number)),
            episode_count: s.episode_count.unwrap_or(0),
            air_date: s.air_date,
            poster_path: s.poster_path,
        }
    }
}

impl From<EpisodeResult> for EpisodeSummary {
    fn from(e: EpisodeResult) -> Self {
        Self {
            episode_number: e.episode_number,
            name: e
                .name
                .unwrap_or_else(|| format!("Episode {}", e.episode_number)),
            overview: e.overview.filter(|o| !o.is_empty()),
            air_date: e.air_date,
            still_path: e.still_path,
            vote_average: e.vote_average,
        }
    }
}
