//! Snapshot models for the cache
//!
//! Serde records used to move cache contents in and out of a process.

pub mod snapshot;

pub use snapshot::{CacheSnapshot, EntrySnapshot};
