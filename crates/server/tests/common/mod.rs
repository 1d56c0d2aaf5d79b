//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock remote catalog injected, so the cache-aside behavior can be
//! exercised end to end without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ressipy_core::{
    testing::{ManualClock, MockCatalogClient},
    CacheConfig, Config, DatabaseConfig, SqliteRecipeStore, SyncConfig, SyncEngine,
};
use ressipy_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use ressipy_core::testing::fixtures;

/// Test fixture for API testing with a mock remote catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_recipe_lookup() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.add_recipe(fixtures::remote_recipe("carbonara", "Carbonara", "pasta")).await;
///
///     let response = fixture.get("/api/v1/recipes/carbonara").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock remote catalog - configure categories and recipes
    pub catalog: Arc<MockCatalogClient>,
    /// Clock driving the staleness window
    pub clock: ManualClock,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty mock catalog.
    pub async fn new() -> Self {
        Self::with_catalog(MockCatalogClient::new()).await
    }

    /// Create a test fixture around a preconfigured mock catalog.
    pub async fn with_catalog(catalog: MockCatalogClient) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            cache: CacheConfig {
                bootstrap_on_empty: false,
                ..Default::default()
            },
            ..Default::default()
        };

        let store = Arc::new(SqliteRecipeStore::new(&db_path).expect("Failed to create store"));
        let catalog = Arc::new(catalog);
        let clock = ManualClock::new(fixtures::base_time());

        let engine = SyncEngine::new(store, catalog.clone(), SyncConfig::from(&config.cache))
            .with_clock(clock.clock());

        let state = Arc::new(AppState::new(config, Arc::new(engine)));
        let router = create_router(state);

        Self {
            router,
            catalog,
            clock,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
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

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
