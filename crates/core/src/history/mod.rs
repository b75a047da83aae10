//! Playback and search history.
//!
//! Both histories are most-recent-first, deduplicated (playback by file
//! ident, searches by query text) and bounded. Playback entries also carry
//! the resume position reported by the player.

mod json_store;

pub use json_store::JsonHistoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from history storage.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No playback entry with this ident.
    #[error("Not in playback history: {0}")]
    NotFound(String),
}

/// A played file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackEntry {
    /// Hoster file ident.
    pub ident: String,
    /// Filename as shown to the user.
    pub name: String,
    #[serde(default)]
    pub size_bytes: u64,
    /// Movie or show title the file was found for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub played_at: DateTime<Utc>,
    /// Seconds into the file where playback stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_secs: Option<u64>,
    #[serde(default)]
    pub finished: bool,
}

impl PlaybackEntry {
    /// New entry played now, with no resume position.
    pub fn new(ident: impl Into<String>, name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            ident: ident.into(),
            name: name.into(),
            size_bytes,
            title: None,
            played_at: Utc::now(),
            resume_secs: None,
            finished: false,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }
}

/// A past search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

/// Persistent history storage.
pub trait HistoryStore: Send + Sync {
    /// Add or move an entry to the front of the playback history.
    fn add_playback(&self, entry: PlaybackEntry) -> Result<(), HistoryError>;

    /// Add or move a query to the front of the search history.
    /// Blank queries are ignored.
    fn add_search(&self, query: &str) -> Result<(), HistoryError>;

    /// Playback history, most recent first.
    fn playback(&self) -> Result<Vec<PlaybackEntry>, HistoryError>;

    /// Search history, most recent first.
    fn searches(&self) -> Result<Vec<SearchEntry>, HistoryError>;

    /// Store a resume position for a played file and clear its finished flag.
    fn record_progress(&self, ident: &str, position_secs: u64)
        -> Result<PlaybackEntry, HistoryError>;

    /// Mark a played file as finished and drop its resume position.
    fn mark_finished(&self, ident: &str) -> Result<PlaybackEntry, HistoryError>;
}
