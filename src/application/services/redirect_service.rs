//! Short identifier lookup and redirect service.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{ShortUrl, is_well_formed_id};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

/// Resolves short identifiers and counts redirects.
pub struct RedirectService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ShortUrlRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Retrieves a record without touching its hit count.
    ///
    /// Identifiers of the wrong length are rejected before any store call.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidIdentifier`] if `id` is not 8 bytes long
    /// - [`AppError::NotFound`] if no record holds `id`
    /// - [`AppError::Store`] on store failures
    pub async fn lookup(&self, id: &str) -> Result<ShortUrl, AppError> {
        if !is_well_formed_id(id) {
            return Err(AppError::invalid_identifier(id));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))
    }

    /// Resolves `id` for a redirect and counts the hit.
    ///
    /// The hit count is incremented atomically in the store. A failed
    /// increment is logged and does not block the redirect; in that case the
    /// returned record carries the count as it was read.
    ///
    /// # Errors
    ///
    /// Same as [`Self::lookup`].
    pub async fn redirect(&self, id: &str) -> Result<ShortUrl, AppError> {
        let mut record = self.lookup(id).await?;

        match self.repository.increment_hit_count(&record.id).await {
            Ok(Some(hit_count)) => record.hit_count = hit_count,
            Ok(None) => warn!(id, "Record disappeared before its hit count was updated"),
            Err(e) => warn!(id, error = %e, "Failed to update hit count"),
        }

        metrics::counter!("shortener_redirects_total").increment(1);
        debug!(id, url = %record.url, hit_count = record.hit_count, "Redirecting");

        Ok(record)
    }
}
