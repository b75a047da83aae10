//! Mock file hoster for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::hoster::{FileHoster, HosterError, StreamLink};
use crate::matching::FileCandidate;

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<FileCandidate>> + Send + Sync>;

/// Mock implementation of the FileHoster trait.
///
/// Provides controllable behavior for testing:
/// - Return configured hits per exact query string
/// - Record every query in the order it was issued
/// - Fail selected queries, or the next call of any kind
///
/// # Example
///
/// ```rust,ignore
/// use streamfind_core::testing::{MockFileHoster, fixtures};
///
/// let hoster = MockFileHoster::new();
/// hoster.set_results("Dark S01E01", vec![fixtures::file("Dark.S01E01.mkv")]).await;
///
/// let result = orchestrator.resolve_episode(&target, &hoster).await?;
/// assert_eq!(hoster.recorded_queries().await, vec!["Dark S01E01"]);
/// ```
pub struct MockFileHoster {
    /// Hits keyed by exact query.
    results: Arc<RwLock<HashMap<String, Vec<FileCandidate>>>>,
    /// Queries that fail once with the stored error.
    failures: Arc<RwLock<HashMap<String, HosterError>>>,
    /// If set, the next call fails with this error.
    next_error: Arc<RwLock<Option<HosterError>>>,
    /// Issued queries, in order.
    queries: Arc<RwLock<Vec<String>>>,
    /// Configured stream links keyed by ident.
    streams: Arc<RwLock<HashMap<String, StreamLink>>>,
    /// Idents passed to resolve_stream, in order.
    resolved: Arc<RwLock<Vec<String>>>,
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockFileHoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFileHoster")
            .field("results", &"<results>")
            .field("queries", &"<queries>")
            .field("query_handler", &"<handler>")
            .finish()
    }
}

impl Default for MockFileHoster {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileHoster {
    /// Create a mock hoster that finds nothing.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            queries: Arc::new(RwLock::new(Vec::new())),
            streams: Arc::new(RwLock::new(HashMap::new())),
            resolved: Arc::new(RwLock::new(Vec::new())),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the hits returned for an exact query.
    pub async fn set_results(&self, query: &str, files: Vec<FileCandidate>) {
        self.results.write().await.insert(query.to_string(), files);
    }

    /// Make the next search for `query` fail.
    pub async fn fail_query(&self, query: &str, error: HosterError) {
        self.failures.write().await.insert(query.to_string(), error);
    }

    /// Configure the next call (search or resolve) to fail.
    pub async fn set_next_error(&self, error: HosterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a handler consulted before the per-query results.
    ///
    /// Returning `None` falls through to the configured results.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<FileCandidate>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Set the link returned for an ident.
    pub async fn set_stream(&self, ident: &str, link: StreamLink) {
        self.streams.write().await.insert(ident.to_string(), link);
    }

    /// Queries issued so far, in order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Idents resolved so far, in order.
    pub async fn resolved_idents(&self) -> Vec<String> {
        self.resolved.read().await.clone()
    }

    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
        self.resolved.write().await.clear();
    }
}

#[async_trait]
impl FileHoster for MockFileHoster {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<FileCandidate>, HosterError> {
        self.queries.write().await.push(query.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(err) = self.failures.write().await.remove(query) {
            return Err(err);
        }

        if let Some(handler) = self.query_handler.read().await.as_ref() {
            if let Some(files) = handler(query) {
                return Ok(files);
            }
        }

        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_stream(&self, ident: &str) -> Result<StreamLink, HosterError> {
        self.resolved.write().await.push(ident.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .streams
            .read()
            .await
            .get(ident)
            .cloned()
            .unwrap_or_else(|| StreamLink::new(format!("https://mock.stream/{}", ident))))
    }
}
