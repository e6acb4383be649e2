//! Repository trait for short URL records.

use crate::domain::entities::ShortUrl;
use async_trait::async_trait;
use thiserror::Error;

/// Which uniqueness constraint an insert ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
    /// Another record already holds the identifier.
    Id,
    /// Another record already holds the URL.
    Url,
}

/// Errors returned by record store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An insert violated a uniqueness constraint.
    #[error("duplicate key on {0:?}")]
    DuplicateKey(DuplicateKey),

    /// The store could not be reached, or the operation timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other store failure.
    #[error("store error: {0}")]
    Backend(String),
}

/// Repository interface for short URL records.
///
/// Records live in a single collection keyed by identifier, with a unique
/// secondary index on URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisShortUrlRepository`] - Redis
/// - [`crate::infrastructure::persistence::MemoryShortUrlRepository`] - in-process maps
/// - [`crate::infrastructure::persistence::TimeoutRepository`] - per-call deadline around any of the above
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Finds a record by its short identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Backend`] on store failures.
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError>;

    /// Finds the record holding `url`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Backend`] on store failures.
    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError>;

    /// Inserts a new record.
    ///
    /// The insert is the collision detector: callers must not check for
    /// existence first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] with [`DuplicateKey::Id`] when the
    /// identifier is taken and [`DuplicateKey::Url`] when the URL is taken.
    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError>;

    /// Overwrites the hit count of a record.
    ///
    /// Returns `Ok(false)` if no record has this identifier.
    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError>;

    /// Atomically adds one to the hit count of a record.
    ///
    /// Returns the new count, or `None` if no record has this identifier.
    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError>;

    /// Creates the unique URL index if it does not exist yet.
    ///
    /// Idempotent; called once at startup.
    async fn ensure_url_index(&self) -> Result<(), StoreError>;

    /// Checks that the store answers.
    async fn ping(&self) -> Result<(), StoreError>;
}
