//! Set Options Module
//!
//! Per-call options for storing a key.

use crate::cache::Ttl;

// == Set Options ==
/// Options for [`Cache::set_with`](crate::Cache::set_with).
///
/// Options belong to the write that carries them: a later `set` on the same
/// key replaces all of them, including `refresh`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOptions<M = ()> {
    /// Expire the key after this long
    pub ttl: Option<Ttl>,
    /// Re-arm the TTL on every `get` (sliding expiration)
    pub refresh: bool,
    /// Auxiliary data returned by `meta`
    pub meta: Option<M>,
}

impl<M> Default for SetOptions<M> {
    fn default() -> Self {
        Self {
            ttl: None,
            refresh: false,
            meta: None,
        }
    }
}

impl<M> SetOptions<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: impl Into<Ttl>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub(crate) fn meta_opt(mut self, meta: Option<M>) -> Self {
        self.meta = meta;
        self
    }
}
