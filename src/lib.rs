//! In-process key-value cache with LRU eviction and per-key expiry timers.
//!
//! Expiry runs on tokio's single-threaded scheduler: any call that arms a
//! TTL must happen inside a [`tokio::task::LocalSet`].
//!
//! ```no_run
//! use std::time::Duration;
//! use ttl_lru::{Cache, CacheConfig, SetOptions};
//!
//! # async fn demo() {
//! let local = tokio::task::LocalSet::new();
//! local
//!     .run_until(async {
//!         let cache: Cache<&str> = Cache::with_config(CacheConfig::new().max_entries(100));
//!         cache
//!             .set("a", "1")
//!             .set_with("b", "2", SetOptions::new().ttl(Duration::from_millis(100)));
//!
//!         assert_eq!(cache.get("b"), Some("2"));
//!         tokio::time::sleep(Duration::from_millis(150)).await;
//!         assert_eq!(cache.get("b"), None);
//!     })
//!     .await;
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{Cache, CacheStats, SetOptions, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use models::{CacheSnapshot, EntrySnapshot};
