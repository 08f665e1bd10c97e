//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::convert::Infallible;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Misses are not errors: `get`/`meta` return `None` and `delete` returns
/// `false` for absent keys.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A TTL that is not a non-negative duration
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<Infallible> for CacheError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
