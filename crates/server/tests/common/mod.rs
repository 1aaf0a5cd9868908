//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that builds the router in-process
//! with mock ranking and bibliographic services injected, so the HTTP
//! surface can be exercised without any external service.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use rankbadge_core::{
    testing::{MockBibliographicService, MockRankingService},
    BibliographicService, Config, RankBadger, RankOptions, RankingService, ServerConfig,
};
use rankbadge_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use rankbadge_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_rank() {
///     let fixture = TestFixture::new().await;
///     fixture.ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
///
///     let response = fixture.post("/api/v1/rank", json!({
///         "title": "Paper",
///         "issns": ["1758-4078"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock ranking service - configure venues and levels
    pub ranking: Arc<MockRankingService>,
    /// Mock bibliographic service - configure harvested works
    pub bibliographic: Arc<MockBibliographicService>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    /// Raw body text
    pub text: String,
    /// Body parsed as JSON, `Null` if it is not JSON
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default options.
    pub async fn new() -> Self {
        Self::with_options(RankOptions::default()).await
    }

    /// Create a test fixture with custom resolver options.
    pub async fn with_options(options: RankOptions) -> Self {
        let ranking = Arc::new(MockRankingService::new());
        let bibliographic = Arc::new(MockBibliographicService::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            resolver: options.clone(),
            ..Default::default()
        };

        let badger = Arc::new(RankBadger::new(
            Arc::clone(&ranking) as Arc<dyn RankingService>,
            Arc::clone(&bibliographic) as Arc<dyn BibliographicService>,
            options,
        ));

        let state = Arc::new(AppState::new(config, badger));
        let router = create_router(state);

        Self {
            router,
            ranking,
            bibliographic,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            text,
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
            $status, $response.status, $response.text
        );
    };
}
