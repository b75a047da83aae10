//! Shared types for matching operations.

use serde::{Deserialize, Serialize};

use crate::catalog::{EpisodeSummary, MetadataRecord};
use crate::matching::normalize::parse_year;

/// What kind of media a target is, with the episode coordinates when it is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Episode {
        season: u32,
        episode: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        episode_name: Option<String>,
    },
}

/// The thing being searched for.
///
/// Season and episode only exist on [`MediaKind::Episode`], so a movie
/// target can never carry episode coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTarget {
    /// Display title, may include diacritics.
    pub title: String,
    /// Alternate / original-language title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release year (first air year for episodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(flatten)]
    pub kind: MediaKind,
}

impl MediaTarget {
    /// Create a movie target.
    pub fn movie(title: impl Into<String>, original_title: Option<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            original_title: original_title.filter(|t| !t.trim().is_empty()),
            year,
            kind: MediaKind::Movie,
        }
    }

    /// Create an episode target.
    pub fn episode(
        show_title: impl Into<String>,
        season: u32,
        episode: u32,
        episode_name: Option<String>,
        year: Option<u16>,
    ) -> Self {
        Self {
            title: show_title.into(),
            original_title: None,
            year,
            kind: MediaKind::Episode {
                season,
                episode,
                episode_name: episode_name.filter(|n| !n.trim().is_empty()),
            },
        }
    }

    /// Build a movie target from a catalog record.
    pub fn from_record(record: &MetadataRecord) -> Self {
        Self::movie(
            record.title.clone(),
            record.original_title.clone(),
            record.year(),
        )
    }

    /// Build an episode target from a TV record and one of its episodes.
    ///
    /// The year comes from the episode's air date, falling back to the show's.
    pub fn episode_from_record(
        record: &MetadataRecord,
        season: u32,
        episode: &EpisodeSummary,
    ) -> Self {
        let year = episode
            .air_date
            .as_deref()
            .and_then(parse_year)
            .or_else(|| record.year());
        let mut target = Self::episode(
            record.title.clone(),
            season,
            episode.episode_number,
            Some(episode.name.clone()),
            year,
        );
        target.original_title = record
            .original_title
            .clone()
            .filter(|t| !t.trim().is_empty());
        target
    }

    /// Whether this is an episode target.
    pub fn is_episode(&self) -> bool {
        matches!(self.kind, MediaKind::Episode { .. })
    }
}

/// A single file-hoster search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Hoster identifier, used to resolve a stream.
    pub id: String,
    /// Raw filename as returned by the hoster.
    pub name: String,
    /// Size in bytes (0 when the hoster did not report one).
    #[serde(default)]
    pub size_bytes: u64,
}

impl FileCandidate {
    /// Validate a raw hit. Returns `None` when the id or name is empty,
    /// since such a hit cannot be played.
    pub fn new(id: impl Into<String>, name: impl Into<String>, size_bytes: Option<u64>) -> Option<Self> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() || name.trim().is_empty() {
            return None;
        }
        Some(Self {
            id,
            name,
            size_bytes: size_bytes.unwrap_or(0),
        })
    }
}

/// A candidate with its relevance score. Only lives for one ranking pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: FileCandidate,
    /// Relevance score. Negative means disqualified.
    pub score: f32,
    /// Normalized form of `candidate.name`.
    pub normalized_name: String,
    /// Which signals contributed to the score.
    pub reasoning: String,
}

/// One generated search string and its position in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAttempt {
    /// 0-based position; lower is tried first.
    pub rank: usize,
    pub query: String,
    /// Title the query was built from. Hits for this query are judged
    /// against it, so an original-title query is scored by that title.
    pub title: String,
}

/// Outcome of a resolve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResult<T> {
    /// Matching candidates, best first. Empty means no match.
    pub candidates: Vec<T>,
    /// Queries sent to the hoster, in order.
    pub queries_tried: Vec<String>,
    /// The query whose results were used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_query: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl<T> ResolveResult<T> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
