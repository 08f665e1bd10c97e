//! LRU Tracker Module
//!
//! Recency order of the cached keys.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Order of keys by access time
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used (moves it to the back).
    ///
    /// Other keys keep their relative order.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(lru: &LruTracker) -> Vec<&str> {
        lru.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_lru_new() {
        let mut lru = LruTracker::new();
        assert!(keys(&lru).is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_touch_new_keys_appends() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");

        assert_eq!(keys(&lru), ["a", "b", "c"]);
    }

    #[test]
    fn test_lru_touch_existing_key_moves_to_back() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(keys(&lru), ["a", "c", "b"]);
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        assert_eq!(lru.evict_oldest(), Some("key1".to_string()));
        assert_eq!(keys(&lru), ["key2", "key3"]);
        assert_eq!(lru.evict_oldest(), Some("key2".to_string()));
        assert_eq!(lru.evict_oldest(), Some("key3".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        lru.remove("key2");
        lru.remove("nonexistent");

        assert_eq!(keys(&lru), ["key1", "key3"]);
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key1");
        lru.touch("key1");

        assert_eq!(keys(&lru), ["key1"]);
        assert_eq!(lru.evict_oldest(), Some("key1".to_string()));
        assert!(keys(&lru).is_empty());
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");

        lru.clear();

        assert!(keys(&lru).is_empty());
    }
}
