//! DTOs for the shorten and lookup endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (HTTP or HTTPS). Its byte-length limit is checked
    /// by the shorten service.
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,

    /// Opaque metadata stored alongside the record.
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Query string of `GET /shorten`.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(rename = "shortId", default)]
    pub short_id: String,
}

/// A short URL record as returned to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShortUrlResponse {
    pub id: String,
    pub url: String,
    #[serde(rename = "hitCount")]
    pub hit_count: i64,
    pub meta: Option<Value>,
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            id: record.id,
            url: record.url,
            hit_count: record.hit_count,
            meta: record.meta,
        }
    }
}
