//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its stored URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Request Flow
///
/// 1. Reject identifiers that are not 8 characters long
/// 2. Load the record from the store
/// 3. Increment its hit count atomically
/// 4. Return 307 Temporary Redirect
///
/// A failed hit-count update is logged and the redirect still happens.
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed identifier and 404 Not Found if
/// the identifier is unknown.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.redirect_service.redirect(&id).await?;

    Ok(Redirect::temporary(&record.url))
}
