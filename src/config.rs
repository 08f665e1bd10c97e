//! Configuration Module
//!
//! Construction options for a cache instance, optionally loaded from
//! environment variables.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Cache configuration parameters.
///
/// The default is an unbounded cache with a generated identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold, `None` = unbounded
    pub max_entries: Option<usize>,
    /// Identifier carried into snapshots, generated when absent
    pub id: Option<String>,
}

impl CacheConfig {
    /// Creates a default (unbounded) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of stored keys. Zero means unbounded.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = (max_entries > 0).then_some(max_entries);
        self
    }

    /// Sets the cache identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: unbounded)
    /// - `CACHE_ID` - Cache identifier (default: generated)
    pub fn from_env() -> Self {
        let config = Self {
            max_entries: None,
            id: env::var("CACHE_ID").ok().filter(|id| !id.is_empty()),
        };

        match env::var("CACHE_MAX_ENTRIES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            Some(max) => config.max_entries(max),
            None => config,
        }
    }

    /// Returns the configured id, or a fresh process-unique one.
    pub(crate) fn resolve_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string(),
        }
    }
}
