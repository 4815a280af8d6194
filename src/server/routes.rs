//! Router configuration for the proxy server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/coupang", get(handlers::coupang_products))
        .route("/api/naver", get(handlers::naver_products))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
