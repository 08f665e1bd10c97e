//! Cache Handle Module
//!
//! The public, chainable API over a [`CacheStore`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cache::{CacheStats, CacheStore, SetOptions, Ttl};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::{CacheSnapshot, EntrySnapshot};

// == Cache ==
/// An LRU cache with per-key expiry timers.
///
/// Each instance owns its storage; there is no shared global cache. The
/// handle is `!Send`: expiry timers run as local tasks on the thread that
/// created them, so calls that arm a TTL need an active
/// [`LocalSet`](tokio::task::LocalSet). Dropping the cache or calling
/// [`clear`](Self::clear) cancels every pending timer.
///
/// `V` is the value type; values that may be "empty" can use `Option<T>`,
/// which keeps a stored `None` distinct from a missing key.
/// `M` is the type of the optional per-entry meta.
pub struct Cache<V, M = ()> {
    store: Rc<RefCell<CacheStore<V, M>>>,
}

impl<V, M> Cache<V, M>
where
    V: 'static,
    M: 'static,
{
    // == Constructors ==
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache from a configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let store = Rc::new_cyclic(|this| RefCell::new(CacheStore::new(&config, this.clone())));
        Self { store }
    }

    /// Creates a cache pre-populated with entries ordered least to most
    /// recently used.
    ///
    /// Entries whose expiry already passed are loaded and removed on the next
    /// scheduler tick.
    ///
    /// # Panics
    /// Panics if any entry carries an expiry and no `LocalSet` is running.
    pub fn with_entries(config: CacheConfig, entries: Vec<EntrySnapshot<V, M>>) -> Self {
        let cache = Self::with_config(config);
        cache.store.borrow_mut().restore(entries);
        cache
    }

    /// Rebuilds a cache from a snapshot, keeping its id and capacity.
    ///
    /// # Panics
    /// Panics if any entry carries an expiry and no `LocalSet` is running.
    pub fn from_snapshot(snapshot: CacheSnapshot<V, M>) -> Self {
        let CacheSnapshot {
            id,
            max_entries,
            entries,
        } = snapshot;

        let config = CacheConfig {
            max_entries,
            id: Some(id),
        };
        Self::with_entries(config, entries)
    }

    /// Rebuilds a cache from the JSON produced by [`to_json`](Self::to_json).
    ///
    /// # Panics
    /// Panics if any entry carries an expiry and no `LocalSet` is running.
    pub fn from_json(json: &str) -> Result<Self>
    where
        V: serde::de::DeserializeOwned,
        M: serde::de::DeserializeOwned,
    {
        let snapshot: CacheSnapshot<V, M> = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    // == Queries ==
    pub fn id(&self) -> String {
        self.store.borrow().id().to_string()
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.store.borrow().max_entries()
    }

    /// Returns true if the key is present. Does not affect recency.
    pub fn has(&self, key: &str) -> bool {
        self.store.borrow().has(key)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.store.borrow_mut().get(key)
    }

    /// Returns the meta stored with `key`. Does not affect recency.
    pub fn meta(&self, key: &str) -> Option<M>
    where
        M: Clone,
    {
        self.store.borrow().meta(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Keys ordered least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.store.borrow().keys()
    }

    /// Entries ordered least to most recently used.
    pub fn entries(&self) -> Vec<EntrySnapshot<V, M>>
    where
        V: Clone,
        M: Clone,
    {
        self.store.borrow().entries()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.borrow().stats()
    }

    /// Number of expiry timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.store.borrow().pending_timers()
    }

    // == Mutations ==
    /// Stores `value` under `key` with no expiry, meta or refresh.
    pub fn set(&self, key: &str, value: V) -> &Self {
        self.set_with(key, value, SetOptions::new())
    }

    /// Stores `value` under `key` with the given options.
    ///
    /// # Panics
    /// Panics if `options.ttl` is set outside of a `LocalSet`. A TTL too
    /// long for the clock to represent never expires and arms no timer.
    pub fn set_with(&self, key: &str, value: V, options: SetOptions<M>) -> &Self {
        self.store.borrow_mut().set(key, value, options);
        self
    }

    /// Removes `key`. Returns false if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        self.store.borrow_mut().delete(key)
    }

    /// Schedules `key` for removal after `ttl`, replacing any earlier expiry.
    ///
    /// `ttl` may be a [`Duration`](std::time::Duration), a millisecond count,
    /// a string such as `"100ms"` or a JSON value. Anything that is not a
    /// non-negative duration fails with [`CacheError::InvalidArgument`] and
    /// leaves the cache untouched. Absent keys are ignored, and so are keys
    /// whose expiry already passed: those are removed instead of revived.
    ///
    /// # Panics
    /// Panics if the key is present and no `LocalSet` is running.
    pub fn expire<T>(&self, key: &str, ttl: T) -> Result<&Self>
    where
        T: TryInto<Ttl>,
        CacheError: From<T::Error>,
    {
        let ttl = ttl.try_into()?;
        self.store.borrow_mut().expire(key, ttl.as_duration());
        Ok(self)
    }

    /// Schedules `key` for removal on the next scheduler tick.
    pub fn expire_now(&self, key: &str) -> &Self {
        self.store.borrow_mut().expire(key, Ttl::ZERO.as_duration());
        self
    }

    /// Removes every entry and cancels all pending timers.
    pub fn clear(&self) -> &Self {
        self.store.borrow_mut().clear();
        self
    }

    // == Serialization ==
    pub fn to_snapshot(&self) -> CacheSnapshot<V, M>
    where
        V: Clone,
        M: Clone,
    {
        self.store.borrow().snapshot()
    }

    pub fn to_json(&self) -> Result<String>
    where
        V: Clone + serde::Serialize,
        M: Clone + serde::Serialize,
    {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }
}

impl<V, M> Default for Cache<V, M>
where
    V: 'static,
    M: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, M> fmt::Debug for Cache<V, M>
where
    V: 'static,
    M: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.try_borrow() {
            Ok(store) => f
                .debug_struct("Cache")
                .field("id", &store.id())
                .field("len", &store.len())
                .field("max_entries", &store.max_entries())
                .finish(),
            Err(_) => f.debug_struct("Cache").finish_non_exhaustive(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_has() {
        let cache: Cache<Option<i32>> = Cache::new();
        cache.set("a", Some(1)).set("b", None);

        assert!(cache.has("a"));
        assert!(cache.has("b"));
        assert!(!cache.has("c"));
    }

    #[test]
    fn test_get_distinguishes_empty_value_from_missing() {
        let cache: Cache<Option<i32>> = Cache::new();
        cache.set("a", Some(1)).set("b", None);

        assert_eq!(cache.get("a"), Some(Some(1)));
        assert_eq!(cache.get("b"), Some(None));
        assert_eq!(cache.get("c"), None);
    }

    #[test]
    fn test_meta() {
        let cache: Cache<i32, serde_json::Value> = Cache::new();
        cache
            .set_with("a", 1, SetOptions::new().meta(json!({"custom": 1})))
            .set("b", 1);

        assert_eq!(cache.meta("a"), Some(json!({"custom": 1})));
        assert_eq!(cache.meta("b"), None);
        assert_eq!(cache.meta("missing"), None);
    }

    #[test]
    fn test_set_overwrites() {
        let cache: Cache<i32> = Cache::new();
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        cache.set("a", 2);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_maintains_most_recently_used() {
        let cache: Cache<i32> = Cache::with_config(CacheConfig::new().max_entries(3));
        cache.set("a", 1).set("b", 2).set("c", 3).set("d", 4);
        cache.get("b");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys(), ["c", "d", "b"]);
    }

    #[test]
    fn test_expire_invalid_ttl_leaves_state_untouched() {
        let cache: Cache<i32> = Cache::new();
        cache.set("a", 1);

        assert!(matches!(
            cache.expire("a", json!(true)),
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(cache.expire("a", -1i64), Err(CacheError::InvalidArgument(_))));
        assert!(matches!(cache.expire("a", f64::NAN), Err(CacheError::InvalidArgument(_))));
        assert!(matches!(cache.expire("a", "later"), Err(CacheError::InvalidArgument(_))));

        assert_eq!(cache.pending_timers(), 0);
        assert!(cache.entries()[0].expires.is_none());
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_expire_missing_key_is_noop() {
        let cache: Cache<i32> = Cache::new();
        assert!(cache.expire("a", 100u64).is_ok());
        cache.expire_now("a");
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let cache: Cache<i32> = Cache::new();
        cache
            .set("a", 1)
            .set_with("b", 2, SetOptions::new().ttl(Duration::MAX));

        assert!(cache.expire("a", 1e22f64).is_ok());

        assert!(cache.has("a"));
        assert!(cache.has("b"));
        assert_eq!(cache.pending_timers(), 0);
        assert!(cache.entries().iter().all(|entry| entry.expires.is_none()));
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_delete() {
        let cache: Cache<i32> = Cache::new();
        cache.set("a", 1);

        assert!(cache.delete("a"));
        assert_eq!(cache.get("a"), None);
        assert!(!cache.delete("a"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear() {
        let cache: Cache<i32> = Cache::new();
        cache.set("a", 1).set("b", 2).set("c", 3);
        assert_eq!(cache.len(), 3);

        cache.clear().clear();

        assert_eq!(cache.len(), 0);
        assert!(!cache.has("a"));
    }

    #[test]
    fn test_json_round_trip_without_expiry() {
        let cache: Cache<i32, String> = Cache::with_config(CacheConfig::new().id("users"));
        cache
            .set("a", 1)
            .set_with("b", 2, SetOptions::new().meta("m".to_string()))
            .set("c", 3);
        cache.get("a");

        let json = cache.to_json().unwrap();
        let copy: Cache<i32, String> = Cache::from_json(&json).unwrap();

        assert_eq!(copy.id(), "users");
        assert_eq!(copy.keys(), ["b", "c", "a"]);
        assert_eq!(copy.meta("b"), Some("m".to_string()));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let result = Cache::<i32>::from_json("{\"id\": 3}");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_debug_output() {
        let cache: Cache<i32> = Cache::with_config(CacheConfig::new().id("dbg"));
        let debug = format!("{:?}", cache);
        assert!(debug.contains("dbg"));
    }
}
