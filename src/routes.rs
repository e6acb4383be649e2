//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`              - Shorten a URL
//! - `GET  /shorten?shortId={id}` - Look up a record
//! - `GET  /{id}`                 - Redirect to the stored URL
//! - `GET  /health`               - Store connectivity check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and the tracing layer.
///
/// Static routes take precedence over `/{id}`, so `/shorten` and `/health`
/// never reach the redirect handler.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{id}", get(redirect_handler))
        .merge(api::routes::shorten_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with trailing slashes trimmed before
/// routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
