//! Expiry Timer Module
//!
//! One-shot timers that remove a key once its TTL has elapsed.

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::cache::store::CacheStore;

// == Expiry Timer ==
/// Owned handle to a pending expiry.
///
/// Cancelling (or dropping) the handle aborts the scheduled task, so a
/// replaced, re-expired or deleted entry never leaves a live callback behind.
/// Cancelling a timer that already fired is a no-op.
#[derive(Debug)]
pub struct ExpiryTimer {
    handle: JoinHandle<()>,
}

impl ExpiryTimer {
    // == Schedule ==
    /// Spawns a task on the current `LocalSet` that deletes `key` from the
    /// store after `delay`.
    ///
    /// The task holds only a weak reference, so a dropped cache never keeps
    /// its store alive through pending timers.
    ///
    /// # Panics
    /// Panics when called outside of a `tokio::task::LocalSet`.
    pub(crate) fn schedule<V, M>(
        store: Weak<RefCell<CacheStore<V, M>>>,
        key: String,
        delay: Duration,
    ) -> Self
    where
        V: 'static,
        M: 'static,
    {
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;

            if let Some(store) = store.upgrade() {
                trace!("Expiry timer fired for key: {}", key);
                store.borrow_mut().remove_expired(&key);
            }
        });

        Self { handle }
    }

    // == Cancel ==
    /// Aborts the pending task.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has fired or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
