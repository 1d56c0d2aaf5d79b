//! Types for the sync engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::RemoteError;
use crate::store::{Category, Recipe, StoreError};

/// The three kinds of logical read the engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Categories,
    Category,
    Recipe,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Categories => "categories",
            ResourceKind::Category => "category",
            ResourceKind::Recipe => "recipe",
        };
        f.write_str(name)
    }
}

fn resource(kind: &ResourceKind, key: &str) -> String {
    if key.is_empty() {
        kind.to_string()
    } else {
        format!("{} {}", kind, key)
    }
}

/// Errors for sync engine operations.
///
/// Only `StoreUnavailable` and `NotFound` reach callers of the read
/// operations. `MergeSkipped` and `RemoteFetchFailed` are absorbed by the
/// engine and logged.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading the local store failed.
    #[error("Local store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Writing remote data into the local store failed.
    #[error("Merge skipped for {}: {source}", resource(.kind, .key))]
    MergeSkipped {
        kind: ResourceKind,
        key: String,
        #[source]
        source: StoreError,
    },

    /// The remote catalog could not be read.
    #[error("Remote fetch failed for {}: {source}", resource(.kind, .key))]
    RemoteFetchFailed {
        kind: ResourceKind,
        key: String,
        #[source]
        source: RemoteError,
    },

    /// Neither the remote catalog nor the local store had the resource.
    #[error("Failed to load {}", resource(.kind, .key))]
    NotFound { kind: ResourceKind, key: String },
}

/// Result of `get_categories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// A category together with its full recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDetail {
    pub name: String,
    pub slug: String,
    pub recipes: Vec<Recipe>,
}

/// Result of `get_category_detail`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDetailResponse {
    pub category: CategoryDetail,
}

/// Result of `get_recipe`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeResponse {
    pub recipe: Recipe,
}

/// What the bootstrap seeder did on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Bootstrap is turned off in the configuration.
    Disabled,
    /// The store already held categories.
    AlreadyPopulated,
    /// The whole catalog was fetched and merged.
    Seeded { categories: usize, recipes: usize },
    /// The seed failed and the store was left as it was.
    Failed(String),
}
