//! Cache-aside sync engine.
//!
//! Every read follows the same path: check the local store, return fresh
//! rows as they are, otherwise fetch from the remote catalog and merge the
//! result. When the remote fetch fails the store is queried again and
//! whatever it holds is returned, regardless of age.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::bootstrap::seed_if_empty;
use super::{
    BootstrapOutcome, CategoriesResponse, CategoryDetail, CategoryDetailResponse, RecipeResponse,
    ResourceKind, SyncConfig, SyncError,
};
use crate::remote::{CatalogClient, RecipeSummary, RemoteError};
use crate::store::{Category, Recipe, RecipeStore, StoreError, StoreStats};

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Orchestrates reads between the local store and the remote catalog.
pub struct SyncEngine {
    store: Arc<dyn RecipeStore>,
    client: Arc<dyn CatalogClient>,
    config: SyncConfig,
    clock: Clock,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        client: Arc<dyn CatalogClient>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            client,
            config,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Create the store schema and, when enabled, seed an empty store.
    pub async fn initialize(&self) -> Result<BootstrapOutcome, SyncError> {
        self.store.initialize()?;

        if !self.config.bootstrap_on_empty {
            return Ok(BootstrapOutcome::Disabled);
        }

        Ok(seed_if_empty(self.store.as_ref(), self.client.as_ref(), self.now()).await)
    }

    /// All categories, sorted by name.
    pub async fn get_categories(&self) -> Result<CategoriesResponse, SyncError> {
        let kind = ResourceKind::Categories;
        let now = self.now();

        let local = self.store.list_categories()?;
        if self
            .config
            .is_set_fresh(local.iter().map(|c| c.updated_at), now)
        {
            debug!("Serving {} categories from local store", local.len());
            return Ok(CategoriesResponse { categories: local });
        }

        match self.client.fetch_categories().await {
            Ok(remote) => {
                let merged_at = self.now();
                let mut categories: Vec<Category> = remote
                    .into_iter()
                    .map(|c| c.into_category(merged_at))
                    .collect();
                categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug)));

                if let Err(e) = self.store.upsert_categories(&categories, merged_at) {
                    self.merge_skipped(kind, "", e);
                }

                Ok(CategoriesResponse { categories })
            }
            Err(source) => {
                self.remote_failed(kind, "", source);

                let local = self.store.list_categories()?;
                if local.is_empty() {
                    return Err(SyncError::NotFound {
                        kind,
                        key: String::new(),
                    });
                }
                Ok(CategoriesResponse { categories: local })
            }
        }
    }

    /// A category with its full recipes.
    ///
    /// Freshness is judged on the category's recipe rows. A remote refresh
    /// fetches every listed recipe individually; recipes that fail to load
    /// are skipped without failing the read.
    pub async fn get_category_detail(
        &self,
        slug: &str,
    ) -> Result<CategoryDetailResponse, SyncError> {
        let kind = ResourceKind::Category;
        let now = self.now();

        let local_recipes = self.store.list_recipes_by_category(slug)?;
        if self
            .config
            .is_set_fresh(local_recipes.iter().map(|r| r.updated_at), now)
        {
            if let Some(category) = self.store.get_category(slug)? {
                debug!(
                    "Serving category {} with {} recipes from local store",
                    slug,
                    local_recipes.len()
                );
                return Ok(detail_response(category.name, slug, local_recipes));
            }
        }

        match self.client.fetch_category_detail(slug).await {
            Ok(remote) => {
                let merged_at = self.now();
                if let Err(e) = self.store.ensure_category(slug, &remote.name) {
                    self.merge_skipped(kind, slug, e);
                }

                let recipes = self.cascade(slug, &remote.recipes, merged_at).await;
                Ok(detail_response(remote.name, slug, recipes))
            }
            Err(source) => {
                self.remote_failed(kind, slug, source);

                let Some(category) = self.store.get_category(slug)? else {
                    return Err(SyncError::NotFound {
                        kind,
                        key: slug.to_string(),
                    });
                };
                let recipes = self.store.list_recipes_by_category(slug)?;
                Ok(detail_response(category.name, slug, recipes))
            }
        }
    }

    /// A single full recipe.
    pub async fn get_recipe(&self, slug: &str) -> Result<RecipeResponse, SyncError> {
        let kind = ResourceKind::Recipe;
        let now = self.now();

        if let Some(recipe) = self.store.get_recipe(slug)? {
            if self.config.is_fresh(recipe.updated_at, now) {
                debug!("Serving recipe {} from local store", slug);
                return Ok(RecipeResponse { recipe });
            }
        }

        match self.client.fetch_recipe(slug).await {
            Ok(remote) => {
                let merged_at = self.now();
                let category = remote.category.clone();
                if let Err(e) = self.store.ensure_category(&category.slug, &category.name) {
                    self.merge_skipped(ResourceKind::Category, &category.slug, e);
                }

                let recipe = remote.into_recipe(&category.slug, merged_at);
                if let Err(e) = self.store.upsert_recipe(&recipe, merged_at) {
                    self.merge_skipped(kind, slug, e);
                }

                Ok(RecipeResponse { recipe })
            }
            Err(source) => {
                self.remote_failed(kind, slug, source);

                match self.store.get_recipe(slug)? {
                    Some(recipe) => Ok(RecipeResponse { recipe }),
                    None => Err(SyncError::NotFound {
                        kind,
                        key: slug.to_string(),
                    }),
                }
            }
        }
    }

    /// Search the local store. Never touches the remote catalog.
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>, SyncError> {
        Ok(self.store.search(query)?)
    }

    /// Row counts of the local store.
    pub fn stats(&self) -> Result<StoreStats, SyncError> {
        Ok(self.store.stats()?)
    }

    /// Drop every cached row. The next read of any kind goes to the remote.
    pub async fn reset_cache(&self) -> Result<(), SyncError> {
        self.store.reset()?;
        info!("Local cache reset");
        Ok(())
    }

    /// Fetch and merge the full recipes behind a category's summaries.
    async fn cascade(
        &self,
        category_slug: &str,
        summaries: &[RecipeSummary],
        merged_at: DateTime<Utc>,
    ) -> Vec<Recipe> {
        // Owned slugs keep the buffered futures free of borrowed closure
        // arguments, so the read stays Send
        let slugs: Vec<String> = summaries.iter().map(|s| s.slug.clone()).collect();
        let total = slugs.len();

        let fetched: Vec<Option<Recipe>> = stream::iter(slugs)
            .map(|slug| async move { self.cascade_one(category_slug, &slug, merged_at).await })
            .buffered(self.config.cascade_concurrency.max(1))
            .collect()
            .await;

        let mut recipes: Vec<Recipe> = fetched.into_iter().flatten().collect();
        recipes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug)));

        debug!(
            "Cascade for category {} loaded {}/{} recipes",
            category_slug,
            recipes.len(),
            total
        );
        recipes
    }

    async fn cascade_one(
        &self,
        category_slug: &str,
        slug: &str,
        merged_at: DateTime<Utc>,
    ) -> Option<Recipe> {
        match self.client.fetch_recipe(slug).await {
            Ok(remote) => {
                let recipe = remote.into_recipe(category_slug, merged_at);
                if let Err(e) = self.store.upsert_recipe(&recipe, merged_at) {
                    self.merge_skipped(ResourceKind::Recipe, slug, e);
                }
                Some(recipe)
            }
            Err(e) => {
                warn!(
                    "Skipping recipe {} of category {}: {}",
                    slug, category_slug, e
                );
                None
            }
        }
    }

    fn merge_skipped(&self, kind: ResourceKind, key: &str, source: StoreError) {
        let err = SyncError::MergeSkipped {
            kind,
            key: key.to_string(),
            source,
        };
        warn!("{}", err);
    }

    fn remote_failed(&self, kind: ResourceKind, key: &str, source: RemoteError) {
        let err = SyncError::RemoteFetchFailed {
            kind,
            key: key.to_string(),
            source,
        };
        warn!("{}; falling back to local store", err);
    }
}

fn detail_response(name: String, slug: &str, recipes: Vec<Recipe>) -> CategoryDetailResponse {
    CategoryDetailResponse {
        category: CategoryDetail {
            name,
            slug: slug.to_string(),
            recipes,
        },
    }
}
