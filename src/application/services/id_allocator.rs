//! Sliding-window identifier allocation.
//!
//! A short identifier is an 8-character window of the URL's digest. The
//! allocator inserts the record under the first window, and on an identifier
//! collision slides the window one character to the right and inserts again.
//! A 32-character digest gives 25 windows; when all of them collide the
//! request fails. Retrying would be pointless because the digest is a pure
//! function of the URL.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::{SHORT_ID_LEN, ShortUrl};
use crate::domain::repositories::{DuplicateKey, ShortUrlRepository, StoreError};

/// Reasons an allocation did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every candidate window was already taken.
    #[error("all {attempts} identifier windows collided")]
    Exhausted { attempts: usize },

    /// Another record claimed the URL while allocation was in progress.
    #[error("URL was stored concurrently")]
    UrlTaken,

    /// The store failed; the loop was aborted.
    #[error(transparent)]
    Store(StoreError),
}

/// Returns the candidate identifiers of a digest, in the order they are tried.
///
/// Yields nothing when the digest is shorter than an identifier.
pub fn candidate_windows(digest: &str) -> impl Iterator<Item = &str> {
    let last_start = digest.len().checked_sub(SHORT_ID_LEN);

    last_start
        .into_iter()
        .flat_map(|last| 0..=last)
        .filter_map(move |start| digest.get(start..start + SHORT_ID_LEN))
}

/// Assigns identifiers by inserting records under successive digest windows.
pub struct IdAllocator<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ShortUrlRepository + ?Sized> IdAllocator<R> {
    /// Creates an allocator that inserts into `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stores a new record for `url` under the first free window of `digest`.
    ///
    /// Attempts are strictly sequential: each one depends on what the
    /// previous inserts left in the store. The returned record has a hit
    /// count of zero.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::Exhausted`] when every window collided
    /// - [`AllocationError::UrlTaken`] when the URL uniqueness index rejected the insert
    /// - [`AllocationError::Store`] on any other store failure, without further attempts
    pub async fn allocate(
        &self,
        digest: &str,
        url: &str,
        meta: Option<Value>,
    ) -> Result<ShortUrl, AllocationError> {
        let mut record = ShortUrl::new(String::new(), url, meta);
        let mut attempts = 0;

        for candidate in candidate_windows(digest) {
            attempts += 1;
            metrics::counter!("shortener_allocation_attempts_total").increment(1);
            record = record.with_id(candidate);

            match self.repository.insert(&record).await {
                Ok(()) => {
                    debug!(id = %record.id, store_calls = attempts, "Allocated short identifier");
                    return Ok(record);
                }
                Err(StoreError::DuplicateKey(DuplicateKey::Id)) => {
                    debug!(candidate, attempt = attempts, "Identifier collision, sliding window");
                }
                Err(StoreError::DuplicateKey(DuplicateKey::Url)) => {
                    return Err(AllocationError::UrlTaken);
                }
                Err(e) => return Err(AllocationError::Store(e)),
            }
        }

        metrics::counter!("shortener_allocation_exhausted_total").increment(1);
        warn!(digest, attempts, "Identifier allocation exhausted");
        Err(AllocationError::Exhausted { attempts })
    }
}
