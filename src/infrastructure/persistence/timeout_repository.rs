//! Per-operation deadline for any repository.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{ShortUrlRepository, StoreError};

/// Bounds every call on the wrapped repository by a fixed timeout.
///
/// An elapsed deadline is reported as [`StoreError::Unavailable`]; callers
/// see it as a store failure, never as a collision or a miss.
pub struct TimeoutRepository<R: ShortUrlRepository + ?Sized> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R: ShortUrlRepository + ?Sized> TimeoutRepository<R> {
    pub fn new(inner: Arc<R>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store operation timed out"
                );
                Err(StoreError::Unavailable(format!(
                    "{operation} timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl<R: ShortUrlRepository + ?Sized> ShortUrlRepository for TimeoutRepository<R> {
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError> {
        self.bounded("find_by_id", self.inner.find_by_id(id)).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError> {
        self.bounded("find_by_url", self.inner.find_by_url(url)).await
    }

    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError> {
        self.bounded("insert", self.inner.insert(record)).await
    }

    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError> {
        self.bounded("update_hit_count", self.inner.update_hit_count(id, hit_count))
            .await
    }

    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError> {
        self.bounded("increment_hit_count", self.inner.increment_hit_count(id))
            .await
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        self.bounded("ensure_url_index", self.inner.ensure_url_index())
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded("ping", self.inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortUrlRepository;
    use crate::infrastructure::persistence::MemoryShortUrlRepository;

    /// Repository whose lookups never finish.
    struct StalledRepository;

    #[async_trait]
    impl ShortUrlRepository for StalledRepository {
        async fn find_by_id(&self, _id: &str) -> Result<Option<ShortUrl>, StoreError> {
            std::future::pending().await
        }
        async fn find_by_url(&self, _url: &str) -> Result<Option<ShortUrl>, StoreError> {
            std::future::pending().await
        }
        async fn insert(&self, _record: &ShortUrl) -> Result<(), StoreError> {
            std::future::pending().await
        }
        async fn update_hit_count(&self, _id: &str, _hit_count: i64) -> Result<bool, StoreError> {
            std::future::pending().await
        }
        async fn increment_hit_count(&self, _id: &str) -> Result<Option<i64>, StoreError> {
            std::future::pending().await
        }
        async fn ensure_url_index(&self) -> Result<(), StoreError> {
            std::future::pending().await
        }
        async fn ping(&self) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_elapsed_operation_is_store_unavailable() {
        let repo = TimeoutRepository::new(Arc::new(StalledRepository), Duration::from_millis(20));

        let err = repo.find_by_id("abcd1234").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(ref msg) if msg.contains("find_by_id")));

        let err = repo
            .insert(&ShortUrl::new("abcd1234", "https://example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_fast_operations_pass_through() {
        let repo = TimeoutRepository::new(
            Arc::new(MemoryShortUrlRepository::new()),
            Duration::from_secs(1),
        );
        let record = ShortUrl::new("abcd1234", "https://example.com", None);

        repo.insert(&record).await.unwrap();

        assert_eq!(repo.find_by_id("abcd1234").await.unwrap(), Some(record));
        assert_eq!(repo.increment_hit_count("abcd1234").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_inner_errors_are_not_rewritten() {
        let mut mock_repo = MockShortUrlRepository::new();
        mock_repo
            .expect_ping()
            .times(1)
            .returning(|| Err(StoreError::Backend("boom".into())));

        let repo = TimeoutRepository::new(Arc::new(mock_repo), Duration::from_secs(1));

        assert_eq!(repo.ping().await, Err(StoreError::Backend("boom".into())));
    }
}
