//! Handlers for the shorten and lookup endpoints.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{LookupQuery, ShortUrlResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, or returns the record it was already shortened to.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "meta": { "campaign": "spring" } }
/// ```
///
/// # Response
///
/// ```json
/// { "id": "c984d06a", "url": "https://example.com", "hitCount": 0, "meta": { "campaign": "spring" } }
/// ```
///
/// Repeating the request for the same URL returns the stored record with
/// its current hit count; the `meta` of the repeat is ignored.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is invalid.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .shorten_service
        .shorten(&payload.url, payload.meta)
        .await?;

    Ok(Json(record.into()))
}

/// Returns the record for a short identifier without counting a hit.
///
/// # Endpoint
///
/// `GET /shorten?shortId={id}`
///
/// # Errors
///
/// - 400 Bad Request if `shortId` is missing or not 8 characters long
/// - 404 Not Found if no record holds the identifier
pub async fn lookup_handler(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let record = state.redirect_service.lookup(&query.short_id).await?;

    Ok(Json(record.into()))
}
