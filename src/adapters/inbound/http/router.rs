use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    create_genre,
    // Title handlers
    create_title,
    delete_asset,
    delete_genre,
    delete_title,
    get_genre,
    get_title,
    health,
    list_genres,
    // Asset handlers
    list_title_assets,
    search_titles,
    sign_asset_url,
    update_genre,
    update_title,
    upload_asset,
};

use crate::ports::services::{AssetService, CatalogService};

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<dyn CatalogService>,
    pub asset_service: Arc<dyn AssetService>,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Title operations
        .route("/titles", post(create_title))
        .route("/titles", get(search_titles))
        .route("/titles/{id}", get(get_title))
        .route("/titles/{id}", put(update_title))
        .route("/titles/{id}", delete(delete_title))
        // Asset operations
        .route("/titles/{id}/assets", post(upload_asset))
        .route("/titles/{id}/assets", get(list_title_assets))
        .route("/assets/{id}/url", get(sign_asset_url))
        .route("/assets/{id}", delete(delete_asset))
        // Genre operations
        .route("/genres", post(create_genre))
        .route("/genres", get(list_genres))
        .route("/genres/{id}", get(get_genre))
        .route("/genres/{id}", put(update_genre))
        .route("/genres/{id}", delete(delete_genre))
        // Health
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add state for dependency injection
        .with_state(state)
}
