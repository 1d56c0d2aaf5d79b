//! Recipe catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ressipy_core::{
    store::StoreStats,
    sync::{CategoriesResponse, CategoryDetailResponse, RecipeResponse},
    Recipe, SyncError,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub recipes: Vec<Recipe>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

fn error_response(err: SyncError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        SyncError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        ),
        SyncError::StoreUnavailable(ref source) => {
            error!("Local store error: {}", source);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Local store unavailable".to_string(),
                }),
            )
        }
        // Absorbed by the engine, never returned from a read
        SyncError::MergeSkipped { .. } | SyncError::RemoteFetchFailed { .. } => {
            error!("Unexpected sync error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal error".to_string(),
                }),
            )
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/categories
///
/// All categories, sorted by name.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, impl IntoResponse> {
    state
        .engine()
        .get_categories()
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1/categories/{slug}
///
/// A category with its full recipes.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryDetailResponse>, impl IntoResponse> {
    state
        .engine()
        .get_category_detail(&slug)
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1/recipes/{slug}
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<RecipeResponse>, impl IntoResponse> {
    state
        .engine()
        .get_recipe(&slug)
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1/search?q=
///
/// Search cached recipes. Never contacts the remote catalog.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, impl IntoResponse> {
    let query = params.q.unwrap_or_default();

    match state.engine().search(&query).await {
        Ok(recipes) => {
            let total = recipes.len();
            Ok(Json(SearchResponse { recipes, total }))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// GET /api/v1/cache/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreStats>, impl IntoResponse> {
    state.engine().stats().map(Json).map_err(error_response)
}

/// DELETE /api/v1/cache
///
/// Drop every cached row.
pub async fn reset_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, impl IntoResponse> {
    match state.engine().reset_cache().await {
        Ok(()) => Ok(Json(SuccessResponse {
            message: "Cache cleared".to_string(),
        })),
        Err(e) => Err(error_response(e)),
    }
}
