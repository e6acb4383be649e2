//! Short URL creation service.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info};

use super::id_allocator::{AllocationError, IdAllocator};
use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{ShortUrlRepository, StoreError};
use crate::error::AppError;
use crate::utils::fingerprint::fingerprint;
use crate::utils::target_url::validate_target_url;

/// Service for creating short URLs.
///
/// Shortening is idempotent per URL: a URL that already has a record gets
/// that record back, unchanged.
pub struct ShortenService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
    allocator: IdAllocator<R>,
}

impl<R: ShortUrlRepository + ?Sized> ShortenService<R> {
    /// Creates a new shorten service.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            allocator: IdAllocator::new(repository.clone()),
            repository,
        }
    }

    /// Returns the record for `url`, creating it on first use.
    ///
    /// # Deduplication
    ///
    /// The store is queried by URL first. Only on a miss is a new identifier
    /// allocated from the URL's fingerprint. `meta` is stored with new records
    /// only; an existing record keeps the metadata it was created with.
    ///
    /// # Concurrent first writes
    ///
    /// Two requests for a brand-new URL can both miss the lookup. The store's
    /// URL index lets only one insert through; the other request then reads
    /// and returns the winning record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an acceptable HTTP(S) URL
    /// - [`AppError::AllocationExhausted`] if every identifier window collided
    /// - [`AppError::Store`] on store failures (not retried)
    pub async fn shorten(&self, url: &str, meta: Option<Value>) -> Result<ShortUrl, AppError> {
        validate_target_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.repository.find_by_url(url).await? {
            debug!(id = %existing.id, "URL already shortened");
            return Ok(existing);
        }

        let digest = fingerprint(url);

        match self.allocator.allocate(&digest, url, meta).await {
            Ok(record) => {
                info!(id = %record.id, url = %record.url, "Created short URL");
                Ok(record)
            }
            Err(AllocationError::UrlTaken) => {
                debug!(url, "URL stored by a concurrent request, returning it");
                self.repository.find_by_url(url).await?.ok_or_else(|| {
                    AppError::Store(StoreError::Backend(
                        "URL index reported a duplicate but no record was found".to_string(),
                    ))
                })
            }
            Err(AllocationError::Exhausted { attempts }) => {
                Err(AppError::AllocationExhausted { attempts })
            }
            Err(AllocationError::Store(e)) => Err(AppError::Store(e)),
        }
    }
}
