//! Short URL entity and identifier rules.

use serde_json::Value;

/// Length of every short identifier, in bytes.
pub const SHORT_ID_LEN: usize = 8;

/// Returns true if `id` has the shape of a short identifier.
///
/// Only the length is checked. Anything of the right length is worth a
/// store lookup; anything else can be rejected without one.
pub fn is_well_formed_id(id: &str) -> bool {
    id.len() == SHORT_ID_LEN
}

/// A stored mapping from a short identifier to its target URL.
///
/// `id` is immutable once the record has been inserted. `hit_count` only
/// ever grows, by one per redirect. `meta` is whatever the caller sent along
/// with the shorten request and is never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: String,
    pub url: String,
    pub hit_count: i64,
    pub meta: Option<Value>,
}

impl ShortUrl {
    /// Creates a record that has not been redirected to yet.
    pub fn new(id: impl Into<String>, url: impl Into<String>, meta: Option<Value>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            hit_count: 0,
            meta,
        }
    }

    /// Returns the same record with a different identifier.
    ///
    /// Used by the allocator to try successive candidate windows.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }
}
