use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::TmdbConfig;
use crate::hoster::{SdilejConfig, WebshareConfig};
use crate::matching::ScoringWeights;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub hoster: Option<HosterConfig>,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Relevance scoring constants.
    #[serde(default)]
    pub matching: ScoringWeights,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Playback and search history storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Directory holding the history files (default: data).
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
    /// Maximum playback entries kept (default: 100).
    #[serde(default = "default_max_playback")]
    pub max_playback: usize,
    /// Maximum search queries kept (default: 50).
    #[serde(default = "default_max_searches")]
    pub max_searches: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: default_history_dir(),
            max_playback: default_max_playback(),
            max_searches: default_max_searches(),
        }
    }
}

fn default_history_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_playback() -> usize {
    100
}

fn default_max_searches() -> usize {
    50
}

/// File hoster configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HosterConfig {
    /// Hoster backend type
    pub backend: HosterBackend,
    /// Required when backend = "webshare"
    #[serde(default)]
    pub webshare: Option<WebshareConfig>,
    /// Required when backend = "sdilej"
    #[serde(default)]
    pub sdilej: Option<SdilejConfig>,
}

/// Available file hosters
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HosterBackend {
    Webshare,
    Sdilej,
}

impl HosterBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            HosterBackend::Webshare => "webshare",
            HosterBackend::Sdilej => "sdilej",
        }
    }
}

/// Metadata catalog configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoster: Option<SanitizedHosterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
    pub matching: ScoringWeights,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedHosterConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webshare: Option<SanitizedWebshareConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdilej: Option<SanitizedSdilejConfig>,
}

/// Webshare config with the password hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedWebshareConfig {
    pub username: String,
    pub password_configured: bool,
    pub search_limit: u32,
    pub timeout_secs: u32,
}

/// Sdilej config with the password hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSdilejConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
    pub per_page: u32,
    pub timeout_secs: u32,
}

/// TMDB config with the API key hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
    pub languages: Vec<String>,
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            history: config.history.clone(),
            hoster: config.hoster.as_ref().map(|h| SanitizedHosterConfig {
                backend: h.backend.as_str().to_string(),
                webshare: h.webshare.as_ref().map(|w| SanitizedWebshareConfig {
                    username: w.username.clone(),
                    password_configured: !w.password.is_empty(),
                    search_limit: w.search_limit,
                    timeout_secs: w.timeout_secs,
                }),
                sdilej: h.sdilej.as_ref().map(|s| SanitizedSdilejConfig {
                    username: s.username.clone(),
                    password_configured: is_set(s.password.as_deref()),
                    per_page: s.per_page,
                    timeout_secs: s.timeout_secs,
                }),
            }),
            tmdb: config.catalog.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                api_key_configured: !t.api_key.is_empty(),
                languages: t.languages.clone(),
            }),
            matching: config.matching.clone(),
        }
    }
}
