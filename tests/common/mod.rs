#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use hashlink::domain::entities::ShortUrl;
use hashlink::domain::repositories::{ShortUrlRepository, StoreError};
use hashlink::infrastructure::persistence::MemoryShortUrlRepository;
use hashlink::state::AppState;

/// In-memory repository that counts calls and can be switched offline.
#[derive(Default)]
pub struct CountingRepository {
    inner: MemoryShortUrlRepository,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl CountingRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShortUrlRepository for CountingRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError> {
        self.enter()?;
        self.inner.find_by_id(id).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError> {
        self.enter()?;
        self.inner.find_by_url(url).await
    }

    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError> {
        self.enter()?;
        self.inner.insert(record).await
    }

    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError> {
        self.enter()?;
        self.inner.update_hit_count(id, hit_count).await
    }

    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError> {
        self.enter()?;
        self.inner.increment_hit_count(id).await
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        self.enter()?;
        self.inner.ensure_url_index().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter()?;
        self.inner.ping().await
    }
}

pub fn create_test_state() -> (AppState, Arc<CountingRepository>) {
    let repository = Arc::new(CountingRepository::default());
    let state = AppState::new(repository.clone());

    (state, repository)
}

pub async fn create_test_record(repository: &CountingRepository, id: &str, url: &str) {
    repository
        .insert(&ShortUrl::new(id, url, None))
        .await
        .unwrap();
}
