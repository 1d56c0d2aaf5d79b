//! Mock remote catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::remote::{
    CatalogClient, CatalogDump, RecipeSummary, RemoteCategory, RemoteCategoryDetail, RemoteError,
    RemoteRecipe,
};

/// A recorded request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path relative to the catalog root, e.g. `/recipes/carbonara`.
    pub path: String,
    /// When the request was made.
    pub timestamp: Instant,
}

/// Mock implementation of the CatalogClient trait.
///
/// Provides controllable behavior for testing:
/// - Serve configured categories, category details and recipes
/// - Record every request, including failed ones
/// - Simulate an unreachable catalog, single failing recipes and latency
///
/// # Example
///
/// ```rust,ignore
/// let client = MockCatalogClient::new();
/// client.add_category_with_recipes("pasta", "Pasta", recipes).await;
/// client.fail_recipe("lasagna").await;
///
/// // ... drive the engine ...
///
/// assert_eq!(client.request_count("/recipes/").await, 2);
/// ```
pub struct MockCatalogClient {
    categories: Arc<RwLock<Vec<RemoteCategory>>>,
    details: Arc<RwLock<HashMap<String, RemoteCategoryDetail>>>,
    recipes: Arc<RwLock<HashMap<String, RemoteRecipe>>>,
    /// Served by `fetch_catalog` when set; otherwise the dump is assembled
    /// from the configured categories and recipes.
    catalog: Arc<RwLock<Option<CatalogDump>>>,
    /// Recipe slugs whose fetch always fails.
    failing_recipes: Arc<RwLock<HashSet<String>>>,
    /// Every request fails while set.
    offline: Arc<RwLock<bool>>,
    /// If set, the next request will fail with this error.
    next_error: Arc<RwLock<Option<RemoteError>>>,
    /// Artificial latency added to each request.
    delay: Arc<RwLock<Option<Duration>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalogClient")
            .field("categories", &"<categories>")
            .field("details", &"<details>")
            .field("recipes", &"<recipes>")
            .field("requests", &"<requests>")
            .finish()
    }
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogClient {
    /// Create a new mock with an empty catalog.
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            recipes: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(RwLock::new(None)),
            failing_recipes: Arc::new(RwLock::new(HashSet::new())),
            offline: Arc::new(RwLock::new(false)),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            requests: Arc::new(RwLock::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the category list served by `fetch_categories`.
    pub async fn set_categories(&self, categories: Vec<RemoteCategory>) {
        *self.categories.write().await = categories;
    }

    /// Set the detail served for one category.
    pub async fn set_category_detail(&self, detail: RemoteCategoryDetail) {
        self.details.write().await.insert(detail.slug.clone(), detail);
    }

    /// Add or replace a recipe served by `fetch_recipe`.
    pub async fn add_recipe(&self, recipe: RemoteRecipe) {
        self.recipes.write().await.insert(recipe.slug.clone(), recipe);
    }

    /// Remove a recipe so its fetch returns `NotFound`.
    pub async fn remove_recipe(&self, slug: &str) {
        self.recipes.write().await.remove(slug);
    }

    /// Register a category, its detail listing and all of its recipes.
    pub async fn add_category_with_recipes(
        &self,
        slug: &str,
        name: &str,
        recipes: Vec<RemoteRecipe>,
    ) {
        {
            let mut categories = self.categories.write().await;
            categories.retain(|c| c.slug != slug);
            categories.push(RemoteCategory {
                slug: slug.to_string(),
                name: name.to_string(),
            });
        }

        let summaries = recipes
            .iter()
            .map(|r| RecipeSummary {
                slug: r.slug.clone(),
                name: r.name.clone(),
            })
            .collect();
        self.set_category_detail(RemoteCategoryDetail {
            name: name.to_string(),
            slug: slug.to_string(),
            recipes: summaries,
        })
        .await;

        let mut stored = self.recipes.write().await;
        for recipe in recipes {
            stored.insert(recipe.slug.clone(), recipe);
        }
    }

    /// Override the bulk catalog served by `fetch_catalog`.
    pub async fn set_catalog(&self, catalog: CatalogDump) {
        *self.catalog.write().await = Some(catalog);
    }

    /// Make every fetch of one recipe fail.
    pub async fn fail_recipe(&self, slug: &str) {
        self.failing_recipes.write().await.insert(slug.to_string());
    }

    /// Simulate an unreachable catalog.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Configure the next request to fail with the given error.
    pub async fn set_next_error(&self, error: RemoteError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add latency to every request.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Number of recorded requests whose path starts with `prefix`.
    pub async fn request_count(&self, prefix: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    /// Total number of recorded requests.
    pub async fn total_requests(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Record the request, wait out the configured delay and apply the
    /// configured failures.
    async fn begin(&self, path: String) -> Result<InFlight, RemoteError> {
        self.requests.write().await.push(RecordedRequest {
            path,
            timestamp: Instant::now(),
        });

        let guard = InFlight::enter(&self.in_flight, &self.max_in_flight);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if *self.offline.read().await {
            return Err(RemoteError::Timeout);
        }

        Ok(guard)
    }
}

/// Tracks concurrent requests for `max_in_flight`.
struct InFlight {
    counter: Arc<AtomicUsize>,
}

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>, max: &Arc<AtomicUsize>) -> Self {
        let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(current, Ordering::SeqCst);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn fetch_categories(&self) -> Result<Vec<RemoteCategory>, RemoteError> {
        let _guard = self.begin("/categories".to_string()).await?;
        Ok(self.categories.read().await.clone())
    }

    async fn fetch_category_detail(
        &self,
        slug: &str,
    ) -> Result<RemoteCategoryDetail, RemoteError> {
        let _guard = self.begin(format!("/categories/{}", slug)).await?;
        self.details
            .read()
            .await
            .get(slug)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("category {}", slug)))
    }

    async fn fetch_recipe(&self, slug: &str) -> Result<RemoteRecipe, RemoteError> {
        let _guard = self.begin(format!("/recipes/{}", slug)).await?;
        if self.failing_recipes.read().await.contains(slug) {
            return Err(RemoteError::Api {
                status: 500,
                message: format!("recipe {} unavailable", slug),
            });
        }
        self.recipes
            .read()
            .await
            .get(slug)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("recipe {}", slug)))
    }

    async fn fetch_catalog(&self) -> Result<CatalogDump, RemoteError> {
        let _guard = self.begin("/data".to_string()).await?;
        if let Some(catalog) = self.catalog.read().await.clone() {
            return Ok(catalog);
        }

        let mut recipes: Vec<RemoteRecipe> = self.recipes.read().await.values().cloned().collect();
        recipes.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(CatalogDump {
            categories: self.categories.read().await.clone(),
            recipes,
        })
    }
}
