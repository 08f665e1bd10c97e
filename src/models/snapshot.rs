//! Snapshot DTOs
//!
//! Transportable form of a cache: its identifier, capacity and entries in
//! recency order with absolute expiry timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached key as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot<V, M = ()> {
    /// The cache key
    pub key: String,
    /// The stored value
    pub value: V,
    /// Auxiliary data attached at set time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
    /// Absolute expiry, None = no expiration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl<V, M> EntrySnapshot<V, M> {
    /// Creates a snapshot entry without meta or expiry.
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
            meta: None,
            expires: None,
        }
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }
}

/// A whole cache, entries ordered least to most recently used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot<V, M = ()> {
    /// Identifier of the cache the snapshot was taken from
    pub id: String,
    /// Capacity of that cache, None = unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    pub entries: Vec<EntrySnapshot<V, M>>,
}
