//! One-time full catalog seed for an empty store.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::BootstrapOutcome;
use crate::remote::{CatalogClient, RemoteCategory};
use crate::store::{Category, Recipe, RecipeStore};

/// Seed the store with the whole remote catalog if it holds no categories.
///
/// Failures are logged and reported in the outcome; they never abort
/// startup, and a failed seed leaves the store untouched.
pub async fn seed_if_empty(
    store: &dyn RecipeStore,
    client: &dyn CatalogClient,
    merged_at: DateTime<Utc>,
) -> BootstrapOutcome {
    match store.stats() {
        Ok(stats) if stats.categories > 0 => return BootstrapOutcome::AlreadyPopulated,
        Ok(_) => {}
        Err(e) => {
            error!("Failed to check store before bootstrap: {}", e);
            return BootstrapOutcome::Failed(e.to_string());
        }
    }

    info!("Store is empty, fetching the full catalog");
    let dump = match client.fetch_catalog().await {
        Ok(dump) => dump,
        Err(e) => {
            error!("Failed to fetch catalog for bootstrap: {}", e);
            return BootstrapOutcome::Failed(e.to_string());
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut categories: Vec<Category> = Vec::with_capacity(dump.categories.len());
    // Recipes may point at categories the category list omits
    let referenced: Vec<RemoteCategory> = dump.recipes.iter().map(|r| r.category.clone()).collect();
    for remote in dump.categories.into_iter().chain(referenced) {
        if seen.insert(remote.slug.clone()) {
            categories.push(remote.into_category(merged_at));
        }
    }

    let recipes: Vec<Recipe> = dump
        .recipes
        .into_iter()
        .map(|remote| {
            let category_slug = remote.category.slug.clone();
            remote.into_recipe(&category_slug, merged_at)
        })
        .collect();

    match store.upsert_catalog_bulk(&categories, &recipes, merged_at) {
        Ok(()) => {
            info!(
                "Initial data loaded: {} categories, {} recipes",
                categories.len(),
                recipes.len()
            );
            BootstrapOutcome::Seeded {
                categories: categories.len(),
                recipes: recipes.len(),
            }
        }
        Err(e) => {
            error!("Failed to store bootstrap catalog: {}", e);
            BootstrapOutcome::Failed(e.to_string())
        }
    }
}
