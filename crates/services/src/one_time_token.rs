//! Single-use anti-replay tokens, one outstanding slot per caller.

use dashmap::DashMap;
use domains::{OneTimeToken, Result, UserId};

use crate::entropy::random_bytes;

/// Bytes of entropy per token; rendered as twice as many hex characters.
pub const TOKEN_BYTES: usize = 16;

/// Per-caller single-slot mailbox of outstanding tokens.
///
/// Each slot is guarded by its map shard lock, so [`verify_and_consume`]
/// compares and removes under one lock acquisition. Tokens never expire on a
/// clock; issuing a new one for the same caller discards the old one.
///
/// [`verify_and_consume`]: OneTimeTokenGuard::verify_and_consume
#[derive(Debug, Default)]
pub struct OneTimeTokenGuard {
    slots: DashMap<UserId, OneTimeToken>,
}

impl OneTimeTokenGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh token for `user`, replacing any outstanding one.
    pub fn issue(&self, user: &UserId) -> Result<OneTimeToken> {
        let token = OneTimeToken::new(hex::encode(random_bytes::<TOKEN_BYTES>()?));
        if self.slots.insert(user.clone(), token.clone()).is_some() {
            tracing::trace!(%user, "replaced outstanding one-time token");
        }
        Ok(token)
    }

    /// Consumes the caller's outstanding token if `presented` equals it.
    ///
    /// Returns `false` without touching the slot when there is no
    /// outstanding token or it does not match; callers cannot tell which.
    pub fn verify_and_consume(&self, user: &UserId, presented: &str) -> bool {
        self.slots
            .remove_if(user, |_, outstanding| outstanding.matches(presented))
            .is_some()
    }

    pub fn has_outstanding(&self, user: &UserId) -> bool {
        self.slots.contains_key(user)
    }
}
