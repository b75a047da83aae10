pub mod catalog;
pub mod config;
pub mod history;
pub mod hoster;
pub mod matching;
pub mod testing;

pub use catalog::{
    CatalogError, EpisodeSummary, MediaType, MetadataCatalog, MetadataRecord, SeasonSummary,
    TmdbClient, TmdbConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, HosterBackend,
    SanitizedConfig,
};
pub use history::{HistoryError, HistoryStore, JsonHistoryStore, PlaybackEntry, SearchEntry};
pub use hoster::{create_hoster, FileHoster, HosterError, StreamLink};
pub use matching::{
    FileCandidate, MatchError, MatchOrchestrator, MediaKind, MediaTarget, QueryAttempt,
    RelevanceScorer, Resolution, ResolveResult, ScoredCandidate, ScoringWeights,
};
