//! Cache Module
//!
//! In-process key-value storage with LRU eviction and per-key TTL timers.

mod entry;
mod handle;
mod lru;
mod options;
mod stats;
mod store;
mod timer;
mod ttl;


// Re-export public types
pub use handle::Cache;
pub use options::SetOptions;
pub use stats::CacheStats;
pub use ttl::Ttl;

pub(crate) use entry::CacheEntry;
pub(crate) use lru::LruTracker;
pub(crate) use store::CacheStore;
pub(crate) use timer::ExpiryTimer;
