use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{catalog, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog reads (cache-aside)
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{slug}", get(catalog::get_category))
        .route("/recipes/{slug}", get(catalog::get_recipe))
        // Local-only
        .route("/search", get(catalog::search))
        .route("/cache/stats", get(catalog::get_stats))
        .route("/cache", delete(catalog::reset_cache))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
