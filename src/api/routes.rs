//! API route configuration.

use crate::api::handlers::{lookup_handler, shorten_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes of the shorten resource.
///
/// # Endpoints
///
/// - `POST /shorten`               - Shorten a URL (idempotent per URL)
/// - `GET  /shorten?shortId={id}`  - Look up a record without counting a hit
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", get(lookup_handler).post(shorten_handler))
}
