//! Record store implementations.
//!
//! # Repositories
//!
//! - [`PgShortUrlRepository`] - PostgreSQL, the default backend
//! - [`RedisShortUrlRepository`] - Redis hashes plus a URL index
//! - [`MemoryShortUrlRepository`] - In-process, for development and tests
//! - [`TimeoutRepository`] - Per-operation deadline around any of the above
//!
//! [`connect`] opens the backend selected in [`Config`] and performs the
//! one-time setup (migrations, URL index); [`open`] only opens it.

pub mod memory_short_url_repository;
pub mod pg_short_url_repository;
pub mod redis_short_url_repository;
pub mod timeout_repository;

pub use memory_short_url_repository::MemoryShortUrlRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
pub use redis_short_url_repository::RedisShortUrlRepository;
pub use timeout_repository::TimeoutRepository;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::ShortUrlRepository;

/// A connected record store with an explicit lifecycle.
///
/// Created once at startup; [`StoreHandle::close`] releases the underlying
/// connections at shutdown.
pub struct StoreHandle {
    pub repository: Arc<dyn ShortUrlRepository>,
    pool: Option<PgPool>,
}

impl StoreHandle {
    /// Closes pooled connections, if the backend has any.
    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}

/// Backoff used while waiting for the store to come up.
fn startup_backoff(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(retries.saturating_sub(1))
}

/// Opens the configured store without touching its schema.
///
/// Retries the initial connection with exponential backoff and wraps the
/// repository in a [`TimeoutRepository`].
///
/// # Errors
///
/// Returns an error if the store stays unreachable.
pub async fn open(config: &Config) -> Result<StoreHandle> {
    let (repository, pool): (Arc<dyn ShortUrlRepository>, Option<PgPool>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = connect_postgres(config).await?;
                tracing::info!("Connected to database");

                let repository: Arc<dyn ShortUrlRepository> =
                    Arc::new(PgShortUrlRepository::new(pool.clone()));
                (repository, Some(pool))
            }
            StorageBackend::Redis => {
                let url = config
                    .redis_url
                    .as_deref()
                    .context("REDIS_URL must be set for the redis backend")?;
                let prefix = config.redis_key_prefix.as_str();

                let repository = Retry::spawn(startup_backoff(config.startup_connect_retries), || {
                    RedisShortUrlRepository::connect(url, prefix)
                })
                .await
                .context("Failed to connect to Redis")?;

                let repository: Arc<dyn ShortUrlRepository> = Arc::new(repository);
                (repository, None)
            }
            StorageBackend::Memory => {
                let repository: Arc<dyn ShortUrlRepository> =
                    Arc::new(MemoryShortUrlRepository::new());
                (repository, None)
            }
        };

    let repository: Arc<dyn ShortUrlRepository> =
        Arc::new(TimeoutRepository::new(repository, config.store_timeout()));

    Ok(StoreHandle { repository, pool })
}

/// Connects to the configured store and prepares it for use.
///
/// - Opens the store (see [`open`])
/// - Runs the embedded migrations (PostgreSQL)
/// - Ensures the unique URL index exists
///
/// # Errors
///
/// Returns an error if the store stays unreachable, migrations fail, or the
/// URL index cannot be created.
pub async fn connect(config: &Config) -> Result<StoreHandle> {
    let store = open(config).await?;

    if let Some(pool) = &store.pool {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Migrations applied");
    }

    store
        .repository
        .ensure_url_index()
        .await
        .context("Failed to ensure unique URL index")?;

    Ok(store)
}

async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres backend")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    Retry::spawn(startup_backoff(config.startup_connect_retries), || {
        let options = options.clone();
        async move {
            options.connect(url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database not reachable yet");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}
