//! Candidate matching and ranking.
//!
//! Given a movie or episode target, this module decides what to search the
//! file hoster for and which of the returned files are real matches:
//!
//! - [`normalize`] canonicalizes titles and filenames for comparison
//! - [`QueryBuilder`] generates the ordered query fallback chain
//! - [`filter_episode_results`] keeps hits carrying the right show and episode code
//! - [`RelevanceScorer`] scores movie hits and drops weak ones
//! - [`MatchOrchestrator`] walks the chain against a [`FileHoster`](crate::hoster::FileHoster)
//!
//! "No match" is an empty result, never an error. The only hard error is
//! asking for the wrong kind of resolution for a target.

mod episode_filter;
pub mod normalize;
mod orchestrator;
mod query_builder;
mod scorer;
mod types;

pub use episode_filter::{episode_code_pattern, filter_episode_results};
pub use normalize::normalize;
pub use orchestrator::{MatchOrchestrator, Resolution};
pub use query_builder::{episode_codes, QueryBuilder};
pub use scorer::{has_video_extension, RelevanceScorer, ScoringWeights};
pub use types::*;

use thiserror::Error;

/// Errors from the matching pipeline.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The target does not fit the requested operation.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}
