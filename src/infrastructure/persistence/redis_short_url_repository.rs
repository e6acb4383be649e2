//! Redis implementation of the short URL repository.
//!
//! # Key Layout
//!
//! - `{prefix}id:{id}` - hash with fields `url`, `meta` (JSON text) and
//!   `hitCount`. `meta` is absent when the caller sent none; `hitCount` is
//!   absent while it is zero.
//! - `{prefix}url:{url}` - string holding the id; this is the URL index.
//!
//! Writes that must check a constraint run as Lua scripts so the check and
//! the write are one atomic step on the server.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{DuplicateKey, ShortUrlRepository, StoreError};

const FIELD_URL: &str = "url";
const FIELD_META: &str = "meta";
const FIELD_HIT_COUNT: &str = "hitCount";

/// KEYS: record, url index. ARGV: id, url, meta ('' for none), hit count.
/// Returns 0 on success, 1 if the id is taken, 2 if the url is taken.
const INSERT_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 1 then return 1 end
if redis.call('EXISTS', KEYS[2]) == 1 then return 2 end
redis.call('HSET', KEYS[1], 'url', ARGV[2])
if ARGV[3] ~= '' then redis.call('HSET', KEYS[1], 'meta', ARGV[3]) end
if ARGV[4] ~= '0' then redis.call('HSET', KEYS[1], 'hitCount', ARGV[4]) end
redis.call('SET', KEYS[2], ARGV[1])
return 0
";

/// KEYS: record. ARGV: hit count. Returns 1 if the record exists, else 0.
const UPDATE_HITS_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then return 0 end
if ARGV[1] == '0' then
  redis.call('HDEL', KEYS[1], 'hitCount')
else
  redis.call('HSET', KEYS[1], 'hitCount', ARGV[1])
end
return 1
";

/// KEYS: record. Returns the new hit count, or nil if the record is absent.
const INCREMENT_HITS_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then return false end
return redis.call('HINCRBY', KEYS[1], 'hitCount', 1)
";

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_timeout() || e.is_connection_dropped() || e.is_io_error() {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

/// Rebuilds a record from the fields of its hash.
///
/// An empty field map means the key does not exist.
fn record_from_fields(
    id: &str,
    mut fields: HashMap<String, String>,
) -> Result<Option<ShortUrl>, StoreError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let url = fields
        .remove(FIELD_URL)
        .ok_or_else(|| StoreError::Backend(format!("record {id} has no url field")))?;

    let hit_count = match fields.get(FIELD_HIT_COUNT) {
        Some(raw) => raw.parse::<i64>().map_err(|e| {
            StoreError::Backend(format!("record {id} has invalid hit count {raw:?}: {e}"))
        })?,
        None => 0,
    };

    let meta = fields
        .get(FIELD_META)
        .map(|raw| serde_json::from_str(raw))
        .transpose()
        .map_err(|e| StoreError::Backend(format!("record {id} has invalid meta: {e}")))?;

    Ok(Some(ShortUrl {
        id: id.to_string(),
        url,
        hit_count,
        meta,
    }))
}

/// Redis repository for short URL records.
///
/// Uses a `ConnectionManager`, which is cloned per operation and reconnects
/// on its own after connection loss.
pub struct RedisShortUrlRepository {
    conn: ConnectionManager,
    key_prefix: String,
    insert_script: Script,
    update_hits_script: Script,
    increment_hits_script: Script,
}

impl RedisShortUrlRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the connection cannot be
    /// established, or [`StoreError::Backend`] if the URL is invalid.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let repository = Self::new(manager, key_prefix);
        repository.ping().await?;

        info!("Connected to Redis");
        Ok(repository)
    }

    /// Wraps an existing connection manager.
    pub fn new(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            insert_script: Script::new(INSERT_SCRIPT),
            update_hits_script: Script::new(UPDATE_HITS_SCRIPT),
            increment_hits_script: Script::new(INCREMENT_HITS_SCRIPT),
        }
    }

    fn record_key(&self, id: &str) -> String {
        format!("{}id:{}", self.key_prefix, id)
    }

    fn url_key(&self, url: &str) -> String {
        format!("{}url:{}", self.key_prefix, url)
    }
}

#[async_trait]
impl ShortUrlRepository for RedisShortUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrl>, StoreError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(self.record_key(id)).await?;

        record_from_fields(id, fields)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, StoreError> {
        let mut conn = self.conn.clone();
        let id: Option<String> = conn.get(self.url_key(url)).await?;

        match id {
            Some(id) => self.find_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn insert(&self, record: &ShortUrl) -> Result<(), StoreError> {
        let meta = match &record.meta {
            Some(meta) => serde_json::to_string(meta)
                .map_err(|e| StoreError::Backend(format!("failed to encode meta: {e}")))?,
            None => String::new(),
        };

        let mut invocation = self.insert_script.prepare_invoke();
        invocation
            .key(self.record_key(&record.id))
            .key(self.url_key(&record.url))
            .arg(&record.id)
            .arg(&record.url)
            .arg(meta)
            .arg(record.hit_count);

        let mut conn = self.conn.clone();
        let outcome: i64 = invocation.invoke_async(&mut conn).await?;

        match outcome {
            0 => Ok(()),
            1 => Err(StoreError::DuplicateKey(DuplicateKey::Id)),
            2 => Err(StoreError::DuplicateKey(DuplicateKey::Url)),
            other => Err(StoreError::Backend(format!(
                "unexpected insert script result {other}"
            ))),
        }
    }

    async fn update_hit_count(&self, id: &str, hit_count: i64) -> Result<bool, StoreError> {
        let mut invocation = self.update_hits_script.prepare_invoke();
        invocation.key(self.record_key(id)).arg(hit_count);

        let mut conn = self.conn.clone();
        let updated: i64 = invocation.invoke_async(&mut conn).await?;

        Ok(updated == 1)
    }

    async fn increment_hit_count(&self, id: &str) -> Result<Option<i64>, StoreError> {
        let mut invocation = self.increment_hits_script.prepare_invoke();
        invocation.key(self.record_key(id));

        let mut conn = self.conn.clone();
        let hit_count: Option<i64> = invocation.invoke_async(&mut conn).await?;

        Ok(hit_count)
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        // The `url:` keys are maintained by the insert script; nothing to build.
        debug!("Redis URL index is maintained on insert");
        self.ping().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_key_decodes_to_none() {
        assert_eq!(record_from_fields("abcd1234", HashMap::new()), Ok(None));
    }

    #[test]
    fn test_absent_hit_count_means_zero() {
        let record = record_from_fields("abcd1234", fields(&[("url", "https://example.com")]))
            .unwrap()
            .unwrap();

        assert_eq!(record, ShortUrl::new("abcd1234", "https://example.com", None));
    }

    #[test]
    fn test_full_record_decodes() {
        let record = record_from_fields(
            "abcd1234",
            fields(&[
                ("url", "https://example.com"),
                ("hitCount", "12"),
                ("meta", r#"{"campaign":"spring"}"#),
            ]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(record.hit_count, 12);
        assert_eq!(record.meta, Some(json!({ "campaign": "spring" })));
    }

    #[test]
    fn test_corrupt_records_are_backend_errors() {
        let no_url = record_from_fields("abcd1234", fields(&[("hitCount", "1")]));
        assert!(matches!(no_url, Err(StoreError::Backend(_))));

        let bad_count = record_from_fields(
            "abcd1234",
            fields(&[("url", "https://example.com"), ("hitCount", "many")]),
        );
        assert!(matches!(bad_count, Err(StoreError::Backend(_))));

        let bad_meta = record_from_fields(
            "abcd1234",
            fields(&[("url", "https://example.com"), ("meta", "{not json")]),
        );
        assert!(matches!(bad_meta, Err(StoreError::Backend(_))));
    }
}
