//! Remote recipe catalog client.
//!
//! The remote catalog is the source of truth. The client issues exactly one
//! request per call and decodes the JSON body; it never retries and never
//! caches, all resilience lives in the sync engine.

mod http;
mod types;

pub use http::HttpCatalogClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
///
/// Every variant means the same thing to the sync engine: the remote fetch
/// failed and it should fall back to the local store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured deadline.
    #[error("Request timed out")]
    Timeout,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to decode the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Trait for remote catalog clients.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// `GET /categories`
    async fn fetch_categories(&self) -> Result<Vec<RemoteCategory>, RemoteError>;

    /// `GET /categories/{slug}`
    async fn fetch_category_detail(&self, slug: &str)
        -> Result<RemoteCategoryDetail, RemoteError>;

    /// `GET /recipes/{slug}`
    async fn fetch_recipe(&self, slug: &str) -> Result<RemoteRecipe, RemoteError>;

    /// `GET /data` - the whole catalog in one response.
    async fn fetch_catalog(&self) -> Result<CatalogDump, RemoteError>;
}
