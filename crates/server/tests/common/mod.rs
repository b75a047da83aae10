//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock collaborators injected and history kept in a temp directory,
//! so the HTTP surface can be exercised without any external service.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use streamfind_core::{
    config::HistoryConfig,
    testing::{MockCatalog, MockFileHoster},
    Config, FileHoster, HistoryStore, JsonHistoryStore, MetadataCatalog,
};
use streamfind_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use streamfind_core::testing::fixtures;

/// Test fixture with controllable mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_resolve() {
///     let fixture = TestFixture::new().await;
///     fixture.hoster.set_results("Dark S01E01", vec![fixtures::file("Dark.S01E01.mkv")]).await;
///
///     let response = fixture.post("/api/v1/resolve/episode", json!({
///         "show_title": "Dark", "season": 1, "episode": 1
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock file hoster - configure search hits and stream links
    pub hoster: Arc<MockFileHoster>,
    /// Mock metadata catalog - configure records, seasons and episodes
    pub catalog: Arc<MockCatalog>,
    /// History store backing the router, for direct inspection
    pub history: Arc<JsonHistoryStore>,
    /// Temporary directory for history files
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Which collaborators the fixture wires in.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub with_hoster: bool,
    pub with_catalog: bool,
    pub config: Config,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_hoster: true,
            with_catalog: true,
            config: Config::default(),
        }
    }
}

impl TestConfig {
    /// No hoster and no catalog configured.
    pub fn bare() -> Self {
        Self {
            with_hoster: false,
            with_catalog: false,
            config: Config::default(),
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with all mocks wired in.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let hoster = Arc::new(MockFileHoster::new());
        let catalog = Arc::new(MockCatalog::new());

        let mut config = test_config.config;
        config.history = HistoryConfig {
            dir: temp_dir.path().join("history"),
            max_playback: 5,
            max_searches: 5,
        };

        let history = Arc::new(JsonHistoryStore::from_config(&config.history));

        let state = Arc::new(AppState::new(
            config,
            test_config
                .with_hoster
                .then(|| Arc::clone(&hoster) as Arc<dyn FileHoster>),
            test_config
                .with_catalog
                .then(|| Arc::clone(&catalog) as Arc<dyn MetadataCatalog>),
            Arc::clone(&history) as Arc<dyn HistoryStore>,
        ));

        Self {
            router: create_router(state),
            hoster,
            catalog,
            history,
            temp_dir,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
