//! File-hoster integration.
//!
//! A [`FileHoster`] searches a file-hosting service for files and resolves
//! a chosen file into a playable [`StreamLink`]. The matching pipeline only
//! ever sees the trait, so tests inject a mock and the server picks a backend
//! from config.

mod sdilej;
mod webshare;

pub use sdilej::{SdilejConfig, SdilejHoster};
pub use webshare::{WebshareConfig, WebshareHoster};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::{HosterBackend, HosterConfig};
use crate::matching::FileCandidate;

/// User-Agent sent to hosters and handed to the player.
pub const USER_AGENT: &str = concat!("streamfind/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when talking to a file hoster.
#[derive(Debug, Error)]
pub enum HosterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Login was rejected or returned no token.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The hoster answered but gave no playable link.
    #[error("No stream available for {0}")]
    NoStream(String),

    /// Hoster returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Missing credentials or backend section.
    #[error("Hoster not configured: {0}")]
    NotConfigured(String),
}

/// A playable URL plus the headers the player must send with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl StreamLink {
    /// Link with only the default User-Agent header.
    pub fn new(url: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
        Self {
            url: url.into(),
            headers,
        }
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.headers
            .insert("Authorization".to_string(), format!("Bearer {}", token));
        self
    }
}

/// A file-hosting service.
#[async_trait]
pub trait FileHoster: Send + Sync {
    /// Short backend name, used in logs and metrics.
    fn name(&self) -> &str;

    /// Full-text file search. Hits with an empty id or name are dropped.
    async fn search(&self, query: &str) -> Result<Vec<FileCandidate>, HosterError>;

    /// Resolve a file id into a playable link.
    async fn resolve_stream(&self, ident: &str) -> Result<StreamLink, HosterError>;
}

/// Build the hoster selected in config.
pub fn create_hoster(config: &HosterConfig) -> Result<Arc<dyn FileHoster>, HosterError> {
    match config.backend {
        HosterBackend::Webshare => {
            let cfg = config.webshare.clone().ok_or_else(|| {
                HosterError::NotConfigured("[hoster.webshare] section is missing".to_string())
            })?;
            Ok(Arc::new(WebshareHoster::new(cfg)?))
        }
        HosterBackend::Sdilej => {
            let cfg = config.sdilej.clone().ok_or_else(|| {
                HosterError::NotConfigured("[hoster.sdilej] section is missing".to_string())
            })?;
            Ok(Arc::new(SdilejHoster::new(cfg)?))
        }
    }
}

/// Read an id that some hosters send as a number and others as a string.
pub(crate) fn json_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a size sent as a number or a numeric string.
pub(crate) fn json_size(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Turn a non-success response into an [`HosterError::ApiError`].
pub(crate) async fn api_error(response: reqwest::Response) -> HosterError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    HosterError::ApiError { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_link_headers() {
        let link = StreamLink::new("https://cdn/file.mkv").with_bearer("tok");
        assert_eq!(link.headers["User-Agent"], USER_AGENT);
        assert_eq!(link.headers["Authorization"], "Bearer tok");
    }

    #[test]
    fn test_json_id_and_size() {
        assert_eq!(json_id(&json!("abc")), Some("abc".to_string()));
        assert_eq!(json_id(&json!(42)), Some("42".to_string()));
        assert_eq!(json_id(&Value::Null), None);

        assert_eq!(json_size(&json!(1024)), Some(1024));
        assert_eq!(json_size(&json!("2048")), Some(2048));
        assert_eq!(json_size(&json!("big")), None);
        assert_eq!(json_size(&json!(-1)), None);
    }

    #[test]
    fn test_create_hoster_requires_backend_section() {
        let config = HosterConfig {
            backend: HosterBackend::Sdilej,
            webshare: None,
            sdilej: None,
        };
        assert!(matches!(
            create_hoster(&config),
            Err(HosterError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_create_hoster_webshare() {
        let config = HosterConfig {
            backend: HosterBackend::Webshare,
            webshare: Some(WebshareConfig {
                username: "user".to_string(),
                password: "pass".to_string(),
                base_url: None,
                search_limit: 30,
                timeout_secs: 10,
            }),
            sdilej: None,
        };
        let hoster = create_hoster(&config).unwrap();
        assert_eq!(hoster.name(), "webshare");
    }
}
