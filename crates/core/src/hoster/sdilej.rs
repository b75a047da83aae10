//! Sdilej.cz API client.
//!
//! The API is undocumented. Premium accounts get a redirect straight to the
//! CDN from `/api/file/download`; free use gets a JSON ticket plus a wait time
//! that has to pass before the ticket can be redeemed for the redirect.
//! Redirects are therefore disabled on the HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{api_error, json_id, json_size, FileHoster, HosterError, StreamLink, USER_AGENT};
use crate::matching::FileCandidate;

const DEFAULT_BASE_URL: &str = "https://www.sdilej.cz";

/// Sdilej client configuration. Credentials are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdilejConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Base URL (default: https://www.sdilej.cz).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Hits per search page (default: 60).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_per_page() -> u32 {
    60
}

fn default_timeout() -> u32 {
    10
}

impl Default for SdilejConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            base_url: None,
            per_page: default_per_page(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Sdilej file hoster.
pub struct SdilejHoster {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
    per_page: u32,
    token: RwLock<Option<String>>,
}

impl SdilejHoster {
    pub fn new(config: SdilejConfig) -> Result<Self, HosterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let credentials = match (config.username, config.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => {
                warn!("Sdilej credentials not set, only free speed and one connection available");
                None
            }
        };

        Ok(Self {
            client,
            base_url,
            credentials,
            per_page: config.per_page,
            token: RwLock::new(None),
        })
    }

    /// Session token, if credentials are configured. Logs in on first use.
    async fn token(&self) -> Result<Option<String>, HosterError> {
        let Some((username, password)) = &self.credentials else {
            return Ok(None);
        };

        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(Some(token.clone()));
        }

        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            return Ok(Some(token.clone()));
        }
        let token = self.login(username, password).await?;
        *guard = Some(token.clone());
        Ok(Some(token))
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, HosterError> {
        let url = format!("{}/api/user/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            HosterError::ParseError(format!("Failed to parse login response: {}", e))
        })?;

        let token = login
            .token
            .or(login.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                HosterError::AuthFailed("Sdilej login returned no token".to_string())
            })?;

        info!("Logged in to Sdilej as {}", username);
        Ok(token)
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    async fn download(
        &self,
        ident: &str,
        ticket: Option<&str>,
        token: Option<&str>,
    ) -> Result<Response, HosterError> {
        let url = format!("{}/api/file/download", self.base_url);
        let mut request = self.client.get(&url).query(&[("id", ident)]);
        if let Some(ticket) = ticket {
            request = request.query(&[("ticket", ticket)]);
        }
        Ok(Self::authorize(request, token).send().await?)
    }

    fn link(location: &str, token: Option<&str>) -> StreamLink {
        let link = StreamLink::new(location);
        match token {
            Some(t) => link.with_bearer(t),
            None => link,
        }
    }
}

/// `Location` of a 301/302 response.
fn redirect_location(response: &Response) -> Option<String> {
    if !matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND
    ) {
        return None;
    }
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

#[async_trait]
impl FileHoster for SdilejHoster {
    fn name(&self) -> &str {
        "sdilej"
    }

    async fn search(&self, query: &str) -> Result<Vec<FileCandidate>, HosterError> {
        let token = self.token().await?;
        let url = format!("{}/api/search", self.base_url);

        debug!("Sdilej search: query='{}'", query);

        let request = self.client.get(&url).query(&[
            ("term", query.to_string()),
            ("page", "1".to_string()),
            ("perPage", self.per_page.to_string()),
            ("types", "video".to_string()),
        ]);
        let response = Self::authorize(request, token.as_deref()).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            HosterError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        Ok(body
            .data
            .into_iter()
            .filter_map(RawItem::into_candidate)
            .collect())
    }

    async fn resolve_stream(&self, ident: &str) -> Result<StreamLink, HosterError> {
        let token = self.token().await?;
        let token = token.as_deref();

        let response = self.download(ident, None, token).await?;
        if let Some(location) = redirect_location(&response) {
            return Ok(Self::link(&location, token));
        }

        if is_json(&response) {
            let payload: TicketResponse = response.json().await.map_err(|e| {
                HosterError::ParseError(format!("Failed to parse download response: {}", e))
            })?;

            if let (Some(ticket), Some(wait)) = (payload.ticket, payload.wait.filter(|w| *w > 0)) {
                info!("Sdilej: waiting {}s for download ticket", wait);
                tokio::time::sleep(Duration::from_secs(wait + 1)).await;

                let redeemed = self.download(ident, Some(&ticket), token).await?;
                if let Some(location) = redirect_location(&redeemed) {
                    return Ok(Self::link(&location, token));
                }
                if !redeemed.status().is_success() {
                    return Err(api_error(redeemed).await);
                }
            }
            return Err(HosterError::NoStream(ident.to_string()));
        }

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Err(HosterError::NoStream(ident.to_string()))
    }
}

// ============================================================================
// Sdilej API Types (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Value,
}

impl RawItem {
    fn into_candidate(self) -> Option<FileCandidate> {
        FileCandidate::new(json_id(&self.id)?, self.name?, json_size(&self.size))
    }
}

#[derive(Debug, Deserialize)]
struct TicketResponse {
    wait: Option<u64>,
    ticket: Option<String>,
}
