//! Secret-keyed digest over a tracking id and the caller it was minted for.

use std::fmt;

use domains::{DomainError, Result, TrackingId, UserId};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Shortest secret accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// HMAC-SHA256 keyed with the server's tracking secret.
///
/// The keyed state is built once and cloned per digest, so the secret itself
/// is only touched in [`KeyedHasher::new`].
#[derive(Clone)]
pub struct KeyedHasher {
    mac: HmacSha256,
}

impl KeyedHasher {
    pub fn new(secret: &SecretString) -> Result<Self> {
        let key = secret.expose_secret().as_bytes();
        if key.len() < MIN_SECRET_LEN {
            return Err(DomainError::Validation(format!(
                "tracking secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        let mac = HmacSha256::new_from_slice(key).map_err(DomainError::internal)?;
        Ok(Self { mac })
    }

    fn keyed(&self, original_id: u64, user: &UserId) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(original_id.to_string().as_bytes());
        // NUL never appears in a decimal id, so the framing is unambiguous.
        mac.update(&[0]);
        mac.update(user.as_str().as_bytes());
        mac
    }

    /// Lowercase hex digest of `(original_id, user)`.
    pub fn digest(&self, original_id: u64, user: &UserId) -> String {
        hex::encode(self.keyed(original_id, user).finalize().into_bytes())
    }

    /// Constant-time check that `tracking_id` was minted for `user`.
    pub fn verify(&self, tracking_id: &TrackingId, user: &UserId) -> bool {
        let Ok(presented) = hex::decode(tracking_id.digest()) else {
            return false;
        };
        self.keyed(tracking_id.original_id(), user)
            .verify_slice(&presented)
            .is_ok()
    }
}

impl fmt::Debug for KeyedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyedHasher(..)")
    }
}
