//! API routes for catalog-server

pub mod auth;
pub mod catalog;
pub mod health;
pub mod sync;

use crate::auth::admin_auth_middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Admin operations (JWT + admin role)
    let admin = Router::new()
        .route("/api/admin/catalog/sync", post(sync::trigger_sync))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    // Public catalog browsing
    let public = Router::new()
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{id}", get(catalog::get_product))
        .route("/api/products/{id}/variants", get(catalog::list_variants))
        .route("/api/vendors", get(catalog::list_vendors))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/tags", get(catalog::list_tags));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .merge(public)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
