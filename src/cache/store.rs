//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and
//! per-key expiry timers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::cache::entry::remaining_until;
use crate::cache::{CacheEntry, CacheStats, ExpiryTimer, LruTracker, SetOptions};
use crate::config::CacheConfig;
use crate::models::{CacheSnapshot, EntrySnapshot};

// == Cache Store ==
/// Owning storage behind a [`Cache`](crate::Cache).
///
/// `entries` and `lru` always hold the same key set; every method that
/// mutates one updates the other before returning.
#[derive(Debug)]
pub struct CacheStore<V, M> {
    /// Identifier carried into snapshots
    id: String,
    /// Maximum number of entries allowed, None = unbounded
    max_entries: Option<usize>,
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V, M>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Activity counters
    stats: CacheStats,
    /// Back-reference handed to expiry timers
    this: Weak<RefCell<CacheStore<V, M>>>,
}

impl<V, M> CacheStore<V, M>
where
    V: 'static,
    M: 'static,
{
    // == Constructor ==
    /// Creates an empty store. `this` must point at the cell that will own it.
    pub fn new(config: &CacheConfig, this: Weak<RefCell<CacheStore<V, M>>>) -> Self {
        Self {
            id: config.resolve_id(),
            max_entries: config.max_entries,
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            this,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    // == Has ==
    /// Checks membership without touching recency.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Get ==
    /// Retrieves a value and marks the key as most recently used.
    ///
    /// Entries with `refresh` set have their TTL re-armed.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_expired(key);
            self.stats.record_miss();
            return None;
        }

        self.lru.touch(key);
        let entry = self.entries.get(key)?;
        let value = entry.value.clone();
        let refresh = entry.refresh_ttl();
        if let Some(ttl) = refresh {
            trace!("Refreshing expiry of key: {}", key);
            self.schedule_expiry(key, ttl);
        }

        self.stats.record_hit();
        Some(value)
    }

    // == Meta ==
    /// Returns the meta attached to a key without touching recency.
    pub fn meta(&self, key: &str) -> Option<M>
    where
        M: Clone,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.meta.clone())
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key.
    ///
    /// Existing keys are updated in place and become most recently used
    /// without a capacity check. New keys evict the least recently used
    /// entry when the cache is full.
    pub fn set(&mut self, key: &str, value: V, options: SetOptions<M>) {
        let SetOptions { ttl, refresh, meta } = options;

        if let Some(entry) = self.entries.get_mut(key) {
            entry.replace(value, meta, refresh);
            trace!("Updated key: {}", key);
        } else {
            if let Some(max) = self.max_entries {
                while self.entries.len() >= max {
                    if !self.evict_oldest() {
                        break;
                    }
                }
            }
            self.entries
                .insert(key.to_string(), CacheEntry::new(value, meta, refresh));
            trace!("Inserted key: {}", key);
        }
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());

        if let Some(ttl) = ttl {
            self.schedule_expiry(key, ttl.as_duration());
        }
    }

    // == Expire ==
    /// Replaces the key's expiry with a fresh timer of `ttl`.
    ///
    /// Returns false when the key is absent.
    pub fn expire(&mut self, key: &str, ttl: Duration) -> bool {
        match self.entries.get(key) {
            None => return false,
            Some(entry) if entry.is_expired() => {
                self.remove_expired(key);
                return false;
            }
            Some(_) => {}
        }
        trace!("Expiring key {} in {:?}", key, ttl);
        self.schedule_expiry(key, ttl);
        true
    }

    fn schedule_expiry(&mut self, key: &str, ttl: Duration) {
        let this = self.this.clone();
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };

        // Cancel before spawning so two timers never overlap
        entry.cancel_timer();
        match Instant::now().checked_add(ttl) {
            Some(deadline) => {
                let timer = ExpiryTimer::schedule(this, key.to_string(), ttl);
                entry.arm(timer, deadline, ttl);
            }
            None => {
                debug!(
                    "TTL {:?} for key {} is out of clock range, key will not expire",
                    ttl, key
                );
                entry.keep_forever(ttl);
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key, cancelling its timer.
    ///
    /// Returns false when the key is absent.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove(key).is_some();
        if removed {
            trace!("Deleted key: {}", key);
        }
        removed
    }

    /// Timer callback: removes a key whose TTL elapsed.
    pub fn remove_expired(&mut self, key: &str) {
        if self.remove(key).is_some() {
            self.stats.record_expiration();
            debug!("Expired key: {}", key);
        }
    }

    fn evict_oldest(&mut self) -> bool {
        let Some(oldest) = self.lru.evict_oldest() else {
            return false;
        };
        self.remove(&oldest);
        self.stats.record_eviction();
        debug!("Evicted least recently used key: {}", oldest);
        true
    }

    /// Single removal path shared by delete, expiry and eviction.
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V, M>> {
        let mut entry = self.entries.remove(key)?;
        entry.cancel_timer();
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    // == Clear ==
    /// Cancels every pending timer and removes all entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        for entry in self.entries.values_mut() {
            entry.cancel_timer();
        }
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        debug!("Cleared {} entries from cache {}", count, self.id);
    }

    // == Restore ==
    /// Loads snapshot entries in order, as if each were set in turn.
    ///
    /// Entries whose expiry already passed are kept and scheduled for
    /// removal on the next tick.
    pub fn restore(&mut self, entries: Vec<EntrySnapshot<V, M>>) {
        for snapshot in entries {
            let EntrySnapshot {
                key,
                value,
                meta,
                expires,
            } = snapshot;

            self.set(&key, value, SetOptions::new().meta_opt(meta));
            if let Some(expires) = expires {
                self.schedule_expiry(&key, remaining_until(expires));
            }
        }
        debug!("Restored {} entries into cache {}", self.entries.len(), self.id);
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().cloned().collect()
    }

    /// Entries from least to most recently used.
    pub fn entries(&self) -> Vec<EntrySnapshot<V, M>>
    where
        V: Clone,
        M: Clone,
    {
        self.lru
            .iter()
            .filter_map(|key| {
                let entry = self.entries.get(key)?;
                Some(EntrySnapshot {
                    key: key.clone(),
                    value: entry.value.clone(),
                    meta: entry.meta.clone(),
                    expires: entry.expires_at_utc(),
                })
            })
            .collect()
    }

    pub fn snapshot(&self) -> CacheSnapshot<V, M>
    where
        V: Clone,
        M: Clone,
    {
        CacheSnapshot {
            id: self.id.clone(),
            max_entries: self.max_entries,
            entries: self.entries(),
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of entries with a timer that has not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.has_pending_timer())
            .count()
    }
}
