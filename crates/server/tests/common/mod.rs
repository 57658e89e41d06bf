//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock upstream catalog injected, enabling end-to-end testing
//! without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pokedex_core::{
    testing::{ManualClock, MockCatalogSource},
    AuthConfig, CatalogCache, CatalogSource, Config, TokenService,
};
use pokedex_server::state::AppState;

/// Re-export fixtures for test convenience
pub use pokedex_core::testing::fixtures;

pub const USERNAME: &str = "ash";
pub const PASSWORD: &str = "pikachu";
pub const TOKEN_SECRET: &str = "e2e-test-secret";

/// Test fixture for E2E testing with a mock upstream.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_listing() {
///     let fixture = TestFixture::new().await;
///     fixture.source.set_index(fixtures::index(3)).await;
///
///     let token = fixture.login_token().await;
///     let response = fixture.get_authed("/pokemons", &token).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock upstream - configure listing, details and failures
    pub source: Arc<MockCatalogSource>,
    /// Clock driving catalog expiry
    pub clock: Arc<ManualClock>,
    /// Token service shared with the server
    pub tokens: Arc<TokenService>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty mock upstream.
    pub async fn new() -> Self {
        let source = Arc::new(MockCatalogSource::new());
        let clock = Arc::new(ManualClock::default());

        let config = Config {
            auth: AuthConfig {
                username: USERNAME.to_string(),
                password: PASSWORD.to_string(),
                token_secret: Some(TOKEN_SECRET.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let tokens = Arc::new(TokenService::from_config(&config.auth));
        let catalog = CatalogCache::with_clock(
            Arc::clone(&source) as Arc<dyn CatalogSource>,
            Arc::clone(&clock) as Arc<dyn pokedex_core::Clock>,
        );

        let state = Arc::new(AppState::with_catalog(
            &config,
            Arc::clone(&tokens),
            Arc::clone(&source) as Arc<dyn CatalogSource>,
            catalog,
        ));

        let router = pokedex_server::api::create_router(state);

        Self {
            router,
            source,
            clock,
            tokens,
        }
    }

    /// Create a fixture whose upstream listing has ids `1..=count`.
    pub async fn with_index(count: u32) -> Self {
        let fixture = Self::new().await;
        fixture.source.set_index(fixtures::index(count)).await;
        fixture
    }

    /// Log in with the configured credentials and return the token.
    pub async fn login_token(&self) -> String {
        let response = self
            .post("/login", json!({ "username": USERNAME, "password": PASSWORD }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// Send an unauthenticated GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request with a bearer token.
    pub async fn get_authed(&self, path: &str, token: &str) -> TestResponse {
        let authorization = format!("Bearer {}", token);
        self.request("GET", path, Some(&authorization), None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let body = serde_json::to_string(&body).unwrap();
        self.request("POST", path, None, Some(&body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, None, Some(body)).await
    }

    /// Send a GET and return the raw response text.
    pub async fn get_text(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

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

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(authorization) = authorization {
            request_builder = request_builder.header(header::AUTHORIZATION, authorization);
        }

        let body = match body {
            Some(body) => {
                request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
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

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
