use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::url_handlers;
use super::AppState;

/// Body limit for the JSON API; long URLs are long, not megabytes long.
const API_BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Create application router
pub fn create_router(state: Arc<AppState>, allowed_origins: Vec<String>) -> axum::Router {
    // Configure CORS with specific origins; the frontend runs on a
    // different origin, so this is part of the public contract.
    let cors = if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // JSON API consumed by the frontend
    let api_routes = axum::Router::new()
        .route("/api/shorten", post(url_handlers::shorten_url))
        .route("/api/urls", get(url_handlers::list_urls))
        .route("/api/stats", get(url_handlers::get_stats))
        .route("/api/health", get(health::health_check))
        .layer(RequestBodyLimitLayer::new(API_BODY_LIMIT_BYTES));

    // Short link visits arrive at the root
    let redirect_routes = axum::Router::new().route("/{code}", get(url_handlers::resolve_url));

    api_routes
        .merge(redirect_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
