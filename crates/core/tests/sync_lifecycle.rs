//! Sync engine lifecycle integration tests.
//!
//! These tests drive the engine over a file-backed store through a full
//! cache lifecycle: bootstrap -> fresh reads -> stale refresh -> offline
//! fallback -> restart -> reset.

use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;

use ressipy_core::{
    remote::CatalogDump,
    testing::{fixtures, ManualClock, MockCatalogClient},
    BootstrapOutcome, RecipeStore, SqliteRecipeStore, SyncConfig, SyncEngine, SyncError,
};

/// Test helper holding a store on disk, a scriptable catalog and a clock.
struct TestHarness {
    store: Arc<SqliteRecipeStore>,
    client: Arc<MockCatalogClient>,
    clock: ManualClock,
    temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("recipes.db");
        let store = Arc::new(SqliteRecipeStore::new(&db_path).expect("Failed to open store"));

        let client = Arc::new(MockCatalogClient::new());
        client
            .add_category_with_recipes(
                "pasta",
                "Pasta",
                vec![
                    fixtures::remote_recipe("carbonara", "Carbonara", "pasta"),
                    fixtures::remote_recipe("lasagna", "Lasagna", "pasta"),
                ],
            )
            .await;
        client
            .add_category_with_recipes(
                "soups",
                "Soups",
                vec![fixtures::remote_recipe("minestrone", "Minestrone", "soups")],
            )
            .await;

        Self {
            store,
            client,
            clock: ManualClock::new(fixtures::base_time()),
            temp_dir,
        }
    }

    fn engine(&self) -> SyncEngine {
        SyncEngine::new(
            self.store.clone(),
            self.client.clone(),
            SyncConfig::default(),
        )
        .with_clock(self.clock.clock())
    }

    /// Open a second store on the same file, as after a process restart.
    fn reopen_store(&self) -> Arc<SqliteRecipeStore> {
        let db_path = self.temp_dir.path().join("recipes.db");
        Arc::new(SqliteRecipeStore::new(&db_path).expect("Failed to reopen store"))
    }
}

#[tokio::test]
async fn test_full_cache_lifecycle() {
    let harness = TestHarness::new().await;
    let engine = harness.engine();

    // Bootstrap fills the empty store in one request
    let outcome = engine.initialize().await.unwrap();
    assert_eq!(
        outcome,
        BootstrapOutcome::Seeded {
            categories: 2,
            recipes: 3
        }
    );
    assert_eq!(harness.client.total_requests().await, 1);

    // Everything is fresh: no remote traffic
    harness.client.clear_recorded().await;
    let categories = engine.get_categories().await.unwrap().categories;
    assert_eq!(categories.len(), 2);
    let pasta = engine.get_category_detail("pasta").await.unwrap().category;
    assert_eq!(pasta.recipes.len(), 2);
    let recipe = engine.get_recipe("minestrone").await.unwrap().recipe;
    assert_eq!(recipe.category_slug, "soups");
    assert_eq!(harness.client.total_requests().await, 0);

    // A day and a bit later the remote is consulted again
    harness.clock.advance(Duration::hours(25));
    engine.get_recipe("minestrone").await.unwrap();
    assert_eq!(harness.client.request_count("/recipes/minestrone").await, 1);

    // Offline: stale rows are still served
    harness.client.set_offline(true).await;
    let pasta = engine.get_category_detail("pasta").await.unwrap().category;
    assert_eq!(pasta.recipes.len(), 2);
    let categories = engine.get_categories().await.unwrap().categories;
    assert_eq!(categories.len(), 2);

    // Unknown resources still fail while offline
    let err = engine.get_recipe("tiramisu").await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound { .. }));
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let harness = TestHarness::new().await;
    harness.engine().initialize().await.unwrap();

    let reopened = harness.reopen_store();
    assert_eq!(reopened.stats().unwrap().recipes, 3);

    harness.client.clear_recorded().await;
    let engine = SyncEngine::new(reopened, harness.client.clone(), SyncConfig::default())
        .with_clock(harness.clock.clock());

    assert_eq!(
        engine.initialize().await.unwrap(),
        BootstrapOutcome::AlreadyPopulated
    );
    let lasagna = engine.get_recipe("lasagna").await.unwrap().recipe;
    assert_eq!(lasagna.ingredients.len(), 2);
    assert_eq!(harness.client.total_requests().await, 0);
}

#[tokio::test]
async fn test_reset_then_refill_from_remote() {
    let harness = TestHarness::new().await;
    let engine = harness.engine();
    engine.initialize().await.unwrap();

    engine.reset_cache().await.unwrap();
    assert_eq!(harness.store.stats().unwrap().categories, 0);
    assert!(engine.search("carbonara").await.unwrap().is_empty());

    harness.client.clear_recorded().await;
    let pasta = engine.get_category_detail("pasta").await.unwrap().category;
    assert_eq!(pasta.recipes.len(), 2);
    assert_eq!(harness.client.request_count("/categories/pasta").await, 1);
    assert_eq!(harness.client.request_count("/recipes/").await, 2);

    let found = engine.search("lasag").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_bootstrap_keeps_categories_only_referenced_by_recipes() {
    let harness = TestHarness::new().await;
    harness
        .client
        .set_catalog(CatalogDump {
            categories: vec![fixtures::remote_category("pasta", "Pasta")],
            recipes: vec![
                fixtures::remote_recipe("carbonara", "Carbonara", "pasta"),
                fixtures::remote_recipe("gazpacho", "Gazpacho", "cold-soups"),
            ],
        })
        .await;

    let outcome = harness.engine().initialize().await.unwrap();
    assert_eq!(
        outcome,
        BootstrapOutcome::Seeded {
            categories: 2,
            recipes: 2
        }
    );
    assert!(harness.store.get_category("cold-soups").unwrap().is_some());
    assert_eq!(
        harness
            .store
            .get_recipe("gazpacho")
            .unwrap()
            .unwrap()
            .category_slug,
        "cold-soups"
    );
}
