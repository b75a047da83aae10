//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits so
//! the matching flow and the HTTP surface can be tested without a real
//! file hoster or metadata catalog.
//!
//! # Example
//!
//! ```rust,ignore
//! use streamfind_core::testing::{MockCatalog, MockFileHoster, fixtures};
//!
//! let hoster = MockFileHoster::new();
//! let catalog = MockCatalog::new();
//!
//! // Configure mock responses
//! hoster.set_results("Dark S01E01", vec![fixtures::file("Dark.S01E01.mkv")]).await;
//! catalog.add_record(fixtures::tv_record("Dark", 2017)).await;
//!
//! // Use in AppState...
//! ```

mod mock_catalog;
mod mock_hoster;

pub use mock_catalog::MockCatalog;
pub use mock_hoster::MockFileHoster;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{EpisodeSummary, MediaType, MetadataRecord, SeasonSummary};
    use crate::matching::FileCandidate;

    /// Create a file candidate with an id derived from the name and a 1 GB size.
    pub fn file(name: &str) -> FileCandidate {
        file_with_id(&format!("id-{}", name.to_lowercase().replace(' ', "-")), name)
    }

    /// Create a file candidate with an explicit id.
    pub fn file_with_id(id: &str, name: &str) -> FileCandidate {
        FileCandidate {
            id: id.to_string(),
            name: name.to_string(),
            size_bytes: 1024 * 1024 * 1024,
        }
    }

    /// Create a movie record released mid-year.
    pub fn movie_record(title: &str, year: u32) -> MetadataRecord {
        MetadataRecord {
            kind: MediaType::Movie,
            id: (year * 100 + title.len() as u32) % 100000,
            title: title.to_string(),
            original_title: None,
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            date: Some(format!("{}-06-15", year)),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
        }
    }

    /// Create a TV record first aired in January.
    pub fn tv_record(title: &str, year: u32) -> MetadataRecord {
        MetadataRecord {
            kind: MediaType::Tv,
            id: (title.len() as u32 * 1000 + year) % 100000,
            title: title.to_string(),
            original_title: None,
            overview: Some(format!("A TV series about {}.", title.to_lowercase())),
            date: Some(format!("{}-01-01", year)),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
        }
    }

    /// Seasons 1..=count with ten episodes each.
    pub fn seasons(count: u32) -> Vec<SeasonSummary> {
        (1..=count)
            .map(|s| SeasonSummary {
                season_number: s,
                name: format!("Season {}", s),
                episode_count: 10,
                air_date: Some(format!("{}-01-01", 2019 + s)),
                poster_path: None,
            })
            .collect()
    }

    /// Episodes 1..=count, named "Episode N".
    pub fn episodes(count: u32) -> Vec<EpisodeSummary> {
        (1..=count)
            .map(|e| EpisodeSummary {
                episode_number: e,
                name: format!("Episode {}", e),
                overview: Some(format!("Episode {} description.", e)),
                air_date: Some(format!("2020-01-{:02}", e)),
                still_path: None,
                vote_average: Some(8.0),
            })
            .collect()
    }
}
