//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{DuplicateKey, ShortUrlRepository, StoreError};

/// Primary key constraint of `short_urls`.
const ID_CONSTRAINT: &str = "short_urls_pkey";

/// Unique index on `short_urls.url`, created by [`PgShortUrlRepository::ensure_url_index`].
const URL_INDEX: &str = "short_urls_url_key";

/// SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: String,
    url: String,
    hit_count: i64,
    meta: Option<Json<Value>>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl {
            id: row.id,
            url: row.url,
            hit_count: row.hit_count,
            meta: row.meta.map(|Json(meta)| meta),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
                Some(ID_CONSTRAINT) => StoreError::DuplicateKey(DuplicateKey::Id),
                Some(URL_INDEX) => StoreError::DuplicateKey(DuplicateKey::Url),
                _ => StoreError::Backend(e.to_string()),
            },
            sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED) => {
                StoreError::Unavailable(e.to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

/// PostgreSQL repository for short URL records.
///
/// The pool is cloned per query; connections are leased for the duration of
/// a single statement.
#[derive(Clone)]
pub struct PgShortUrlRepository {
    pool: PgPool,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, url, hit_count, meta
            FROM short_urls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, url, hit_count, meta
            FROM short_urls
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO short_urls (id, url, hit_count, meta)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.id)
        .bind(&record.url)
        .bind(record.hit_count)
        .bind(record.meta.as_ref().map(Json))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE short_urls SET hit_count = $2 WHERE id = $1")
            .bind(id)
            .bind(hit_count)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError> {
        let hit_count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE short_urls
            SET hit_count = hit_count + 1
            WHERE id = $1
            RETURNING hit_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hit_count)
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        tracing::info!("Ensuring unique index on short_urls.url");

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS short_urls_url_key ON short_urls (url)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
