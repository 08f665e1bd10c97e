//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::cache::ExpiryTimer;

// == Cache Entry ==
/// A single cached key with its value, metadata and expiry state.
#[derive(Debug)]
pub struct CacheEntry<V, M> {
    /// The stored value
    pub value: V,
    /// Auxiliary data attached at set time
    pub meta: Option<M>,
    /// Deadline of the pending expiry, None = no expiration
    pub expires_at: Option<Instant>,
    /// TTL of the most recent expiry, re-armed on access when `refresh` is set
    pub ttl: Option<Duration>,
    /// Slide the expiry forward on every `get`
    pub refresh: bool,
    timer: Option<ExpiryTimer>,
}

impl<V, M> CacheEntry<V, M> {
    // == Constructor ==
    /// Creates a new entry without expiry.
    pub fn new(value: V, meta: Option<M>, refresh: bool) -> Self {
        Self {
            value,
            meta,
            expires_at: None,
            ttl: None,
            refresh,
            timer: None,
        }
    }

    // == Replace ==
    /// Overwrites the value and options in place, discarding any pending expiry.
    pub fn replace(&mut self, value: V, meta: Option<M>, refresh: bool) {
        self.cancel_timer();
        self.value = value;
        self.meta = meta;
        self.refresh = refresh;
        self.expires_at = None;
        self.ttl = None;
    }

    // == Arm ==
    /// Installs a new expiry timer, cancelling the previous one first.
    pub fn arm(&mut self, timer: ExpiryTimer, deadline: Instant, ttl: Duration) {
        self.cancel_timer();
        self.expires_at = Some(deadline);
        self.ttl = Some(ttl);
        self.timer = Some(timer);
    }

    /// Records a TTL too long for the clock to represent: the entry never
    /// expires, but `refresh` still sees the TTL.
    pub fn keep_forever(&mut self, ttl: Duration) {
        self.cancel_timer();
        self.expires_at = None;
        self.ttl = Some(ttl);
    }

    /// Cancels the pending expiry, if any.
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Returns true while an expiry task is scheduled and has not run.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    // == Is Expired ==
    /// Checks if the deadline has passed.
    ///
    /// The timer normally removes the entry first; this guards the window
    /// between the deadline and the timer task being polled.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() > deadline)
    }

    /// TTL to re-arm on access, if this entry slides its expiry.
    pub fn refresh_ttl(&self) -> Option<Duration> {
        if self.refresh {
            self.ttl
        } else {
            None
        }
    }

    // == Wall Clock Expiry ==
    /// Returns the deadline as an absolute UTC timestamp.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at.map(|deadline| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            chrono::Duration::from_std(remaining)
                .ok()
                .and_then(|remaining| Utc::now().checked_add_signed(remaining))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }
}

/// Time left until `expires`, zero if it already passed.
pub fn remaining_until(expires: DateTime<Utc>) -> Duration {
    (expires - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}
