//! Webshare.cz API client.
//!
//! Logs in lazily on first use and keeps the session token for the life of
//! the client. Every call after login sends `Authorization: Bearer <token>`.
//! A rejected token triggers one fresh login and one retry of the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{api_error, json_id, json_size, FileHoster, HosterError, StreamLink, USER_AGENT};
use crate::matching::FileCandidate;

const DEFAULT_BASE_URL: &str = "https://webshare.cz";

/// Webshare client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebshareConfig {
    pub username: String,
    pub password: String,
    /// Base URL (default: https://webshare.cz).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum hits per search (default: 30).
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_search_limit() -> u32 {
    30
}

fn default_timeout() -> u32 {
    10
}

/// Webshare file hoster.
pub struct WebshareHoster {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    search_limit: u32,
    token: RwLock<Option<String>>,
}

impl WebshareHoster {
    pub fn new(config: WebshareConfig) -> Result<Self, HosterError> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(HosterError::NotConfigured(
                "Webshare username and password are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            username: config.username,
            password: config.password,
            search_limit: config.search_limit,
            token: RwLock::new(None),
        })
    }

    /// Cached session token, logging in when there is none yet.
    async fn token(&self) -> Result<String, HosterError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut guard = self.token.write().await;
        // Another task may have logged in while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.login().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn login(&self) -> Result<String, HosterError> {
        let url = format!("{}/api/login/", self.base_url);
        debug!("Webshare login: user='{}'", self.username);

        let response = self
            .client
            .post(&url)
            .form(&[("username", &self.username), ("password", &self.password)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            HosterError::ParseError(format!("Failed to parse login response: {}", e))
        })?;

        if login.status.as_deref() != Some("OK") {
            return Err(HosterError::AuthFailed(format!(
                "Webshare login returned status {:?}",
                login.status
            )));
        }

        let token = login
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HosterError::AuthFailed("Webshare login returned no token".into()))?;

        info!("Logged in to Webshare as {}", self.username);
        Ok(token)
    }

    /// Authorized GET. On 401 the token is dropped, a new one obtained and
    /// the request sent once more; a second 401 is `AuthFailed`.
    async fn get_authorized(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Response, HosterError> {
        for attempt in 0..2 {
            let token = self.token().await?;
            let response = self
                .client
                .get(url)
                .query(params)
                .bearer_auth(&token)
                .send()
                .await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }
            self.forget_token().await;
            if attempt == 0 {
                debug!("Webshare token rejected, logging in again");
            }
        }
        Err(HosterError::AuthFailed("Webshare token rejected".to_string()))
    }

    /// Drop the cached token after the hoster rejected it.
    async fn forget_token(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait]
impl FileHoster for WebshareHoster {
    fn name(&self) -> &str {
        "webshare"
    }

    async fn search(&self, query: &str) -> Result<Vec<FileCandidate>, HosterError> {
        let url = format!("{}/api/file_search/", self.base_url);

        debug!("Webshare search: query='{}'", query);

        let response = self
            .get_authorized(
                &url,
                &[
                    ("search", query.to_string()),
                    ("limit", self.search_limit.to_string()),
                ],
            )
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            HosterError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        let total = body.files.len();
        let files: Vec<FileCandidate> = body
            .files
            .into_iter()
            .filter_map(RawFile::into_candidate)
            .collect();

        if files.len() < total {
            warn!(
                dropped = total - files.len(),
                "Webshare returned files without ident or name"
            );
        }

        Ok(files)
    }

    async fn resolve_stream(&self, ident: &str) -> Result<StreamLink, HosterError> {
        let url = format!("{}/api/file_link/", self.base_url);

        debug!("Webshare file link: ident={}", ident);

        let response = self
            .get_authorized(&url, &[("ident", ident.to_string())])
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: LinkResponse = response.json().await.map_err(|e| {
            HosterError::ParseError(format!("Failed to parse file link response: {}", e))
        })?;

        body.url
            .filter(|u| !u.is_empty())
            .map(StreamLink::new)
            .ok_or_else(|| HosterError::NoStream(ident.to_string()))
    }
}

// ============================================================================
// Webshare API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginResponse {
    status: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(default)]
    ident: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Value,
}

impl RawFile {
    fn into_candidate(self) -> Option<FileCandidate> {
        FileCandidate::new(json_id(&self.ident)?, self.name?, json_size(&self.size))
    }
}

#[derive(Debug, Deserialize)]
struct LinkResponse {
    url: Option<String>,
}
