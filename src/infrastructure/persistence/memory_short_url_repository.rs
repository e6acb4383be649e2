//! In-process implementation of the short URL repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{DuplicateKey, ShortUrlRepository, StoreError};

#[derive(Debug, Default)]
struct Tables {
    by_id: HashMap<String, ShortUrl>,
    /// url -> id
    by_url: HashMap<String, String>,
}

/// Repository backed by two in-process maps behind one lock.
///
/// Both uniqueness constraints are checked and written under the same write
/// lock, so concurrent inserts behave like a store with a unique URL index.
/// Data does not survive a restart; intended for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryShortUrlRepository {
    tables: RwLock<Tables>,
}

impl MemoryShortUrlRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.tables.read().await.by_id.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ShortUrlRepository for MemoryShortUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError> {
        Ok(self.tables.read().await.by_id.get(id).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .by_url
            .get(url)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if tables.by_id.contains_key(&record.id) {
            return Err(StoreError::DuplicateKey(DuplicateKey::Id));
        }
        if tables.by_url.contains_key(&record.url) {
            return Err(StoreError::DuplicateKey(DuplicateKey::Url));
        }

        tables
            .by_url
            .insert(record.url.clone(), record.id.clone());
        tables.by_id.insert(record.id.clone(), record.clone());

        Ok(())
    }

    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(match tables.by_id.get_mut(id) {
            Some(record) => {
                record.hit_count = hit_count;
                true
            }
            None => false,
        })
    }

    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables.by_id.get_mut(id).map(|record| {
            record.hit_count += 1;
            record.hit_count
        }))
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
