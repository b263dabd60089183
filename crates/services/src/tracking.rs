//! Stateless tracking identity carried in a cookie.
//!
//! A tracking id is `originalId_digest` where the digest binds the random id
//! to the caller it was minted for. Validity is recomputed on every request;
//! the server keeps no copy.

use chrono::{DateTime, Duration, Utc};
use domains::{DomainError, Result, TrackingId, UserId};

use crate::entropy::random_bytes;
use crate::keyed_hash::KeyedHasher;

/// Outcome of resolving the tracking cookie for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The presented cookie was valid for this caller; nothing to write back.
    Kept(TrackingId),
    /// A fresh id was minted and must be sent as a cookie expiring at `expires`.
    Minted {
        tracking_id: TrackingId,
        expires: DateTime<Utc>,
    },
}

impl Resolution {
    pub fn tracking_id(&self) -> &TrackingId {
        match self {
            Resolution::Kept(id) => id,
            Resolution::Minted { tracking_id, .. } => tracking_id,
        }
    }

    pub fn into_tracking_id(self) -> TrackingId {
        match self {
            Resolution::Kept(id) => id,
            Resolution::Minted { tracking_id, .. } => tracking_id,
        }
    }

    /// Expiry of the cookie to set, if one has to be set at all.
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        match self {
            Resolution::Kept(_) => None,
            Resolution::Minted { expires, .. } => Some(*expires),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackingIdentityManager {
    hasher: KeyedHasher,
    ttl: Duration,
}

impl TrackingIdentityManager {
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    pub fn new(hasher: KeyedHasher) -> Self {
        Self::with_ttl(hasher, Duration::hours(Self::DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(hasher: KeyedHasher, ttl: Duration) -> Self {
        Self { hasher, ttl }
    }

    /// Returns the presented tracking id if it is well-formed and was minted
    /// for `user`; otherwise mints a replacement.
    ///
    /// Malformed, tampered and foreign cookies are all handled the same way
    /// as a missing one. Errors are an unavailable entropy source or an
    /// expiry past the representable date range.
    pub fn resolve(&self, presented: Option<&str>, user: &UserId) -> Result<Resolution> {
        if let Some(raw) = presented {
            match TrackingId::parse(raw) {
                Ok(id) if self.hasher.verify(&id, user) => return Ok(Resolution::Kept(id)),
                Ok(_) => tracing::debug!(%user, "tracking id failed verification, re-minting"),
                Err(_) => tracing::debug!(%user, "malformed tracking id, re-minting"),
            }
        }

        let expires = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| DomainError::Internal("tracking cookie expiry out of range".into()))?;
        let tracking_id = self.mint(user)?;
        Ok(Resolution::Minted { tracking_id, expires })
    }

    fn mint(&self, user: &UserId) -> Result<TrackingId> {
        // 56 random bits, as a u64 with the top byte clear.
        let mut buf = [0u8; 8];
        buf[1..].copy_from_slice(&random_bytes::<7>()?);
        let original_id = u64::from_be_bytes(buf);
        Ok(TrackingId::new(original_id, self.hasher.digest(original_id, user)))
    }
}
