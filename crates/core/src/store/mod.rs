//! Local recipe store - a persistent cache of the remote catalog.
//!
//! The store holds categories and recipes with a per-row `updated_at`
//! timestamp. It is a cache, not a source of truth: rows are created and
//! refreshed by merges from the remote catalog and removed only by `reset`.

mod sqlite;
mod types;

pub use sqlite::SqliteRecipeStore;
pub use types::*;

use chrono::{DateTime, Utc};

/// Trait for recipe cache storage.
pub trait RecipeStore: Send + Sync {
    /// Create the schema if absent. Safe to call any number of times.
    fn initialize(&self) -> Result<(), StoreError>;

    /// All categories, sorted by name.
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Get a single category by slug.
    fn get_category(&self, slug: &str) -> Result<Option<Category>, StoreError>;

    /// Replace the full category set in one transaction.
    ///
    /// Listed categories are upserted with `merged_at`; categories not in the
    /// list are removed together with their recipes.
    fn upsert_categories(
        &self,
        categories: &[Category],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Make sure a category row exists so recipes can reference it.
    ///
    /// A new row is created with the epoch as `updated_at`. An existing row
    /// only has its name refreshed.
    fn ensure_category(&self, slug: &str, name: &str) -> Result<(), StoreError>;

    /// Recipes of a category, sorted by name.
    fn list_recipes_by_category(&self, slug: &str) -> Result<Vec<Recipe>, StoreError>;

    /// Get a single recipe by slug.
    fn get_recipe(&self, slug: &str) -> Result<Option<Recipe>, StoreError>;

    /// Insert or update a recipe keyed by slug.
    fn upsert_recipe(&self, recipe: &Recipe, merged_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Insert or update many recipes in one transaction.
    ///
    /// Every referenced category must already exist, otherwise nothing is
    /// written.
    fn upsert_recipes_bulk(
        &self,
        recipes: &[Recipe],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Insert or update categories and recipes in one transaction.
    ///
    /// Used for the bootstrap seed. Unlike `upsert_categories` this never
    /// removes rows.
    fn upsert_catalog_bulk(
        &self,
        categories: &[Category],
        recipes: &[Recipe],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Case-insensitive substring search over name, author and ingredients.
    fn search(&self, query: &str) -> Result<Vec<Recipe>, StoreError>;

    /// Row counts.
    fn stats(&self) -> Result<StoreStats, StoreError>;

    /// Delete all rows from both tables, keeping the schema.
    fn reset(&self) -> Result<(), StoreError>;
}
