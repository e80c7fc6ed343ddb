//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that builds the router in-process
//! with mock stores injected, so the HTTP surface can be tested without
//! Cloudflare.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use dramas_core::{
    testing::{MockCacheStore, MockQueryStore},
    Config, ResultCache,
};

/// Re-export fixtures for test convenience
pub use dramas_core::testing::fixtures;

/// Test fixture with mock query store and cache.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.seed_mars().await;
///
///     let response = fixture.get("/api/search?q=mars").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock query store - configure rows per statement
    pub store: Arc<MockQueryStore>,
    /// Mock cache store - inspect cached entries
    pub cache: Arc<MockCacheStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MockQueryStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let state = Arc::new(dramas_server::state::AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn dramas_core::QueryStore>,
            ResultCache::new(Arc::clone(&cache) as Arc<dyn dramas_core::CacheStore>),
        ));

        let router = dramas_server::api::create_router(state);

        Self {
            router,
            store,
            cache,
        }
    }

    /// A fixture whose rate limiter allows `max_requests` per window.
    pub async fn with_rate_limit(max_requests: u32) -> Self {
        let mut config = Config::default();
        config.rate_limit.max_requests = max_requests;
        Self::with_config(config).await
    }

    /// Seed the store with one show matching "mars".
    pub async fn seed_mars(&self) {
        self.store
            .respond_when("COUNT(*)", vec![fixtures::row(json!({ "c": 1 }))])
            .await;
        self.store
            .respond_when(
                "FROM radio_shows",
                vec![fixtures::row(json!({
                    "id": 42,
                    "identifier": "Mars",
                    "title": "Mars Is Heaven",
                    "description": "A crew lands on Mars",
                    "year": 1950,
                    "downloads": 14200
                }))],
            )
            .await;
        self.store
            .respond_when(
                "FROM audio_files",
                vec![fixtures::row(json!({
                    "radio_show_id": 42,
                    "id": 7,
                    "streaming_url": "https://archive.org/mars.mp3",
                    "download_url": null,
                    "duration": 1695
                }))],
            )
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request_builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }
        let request = request_builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON pointer equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json.pointer($path).cloned().unwrap_or(serde_json::Value::Null);
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
