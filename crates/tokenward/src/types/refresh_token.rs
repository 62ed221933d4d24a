//! Refresh token record.
//!
//! Refresh tokens are persisted, single-use credentials: consumed exactly
//! once on refresh, or expired if unused within their lifetime. There are
//! no other transitions; a token is never reactivated or extended.
//!
//! # Storage Security
//!
//! The opaque token value is never stored. Only a SHA-256 hash is persisted,
//! similar to password storage. When consuming a refresh token:
//!
//! 1. Hash the incoming value
//! 2. Atomically remove the matching live row
//! 3. The caller that removed the row wins; everyone else fails

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Refresh token row as persisted by a [`RefreshTokenStore`].
///
/// [`RefreshTokenStore`]: crate::storage::RefreshTokenStore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    /// Unique identifier for this row.
    pub id: Uuid,

    /// SHA-256 hash of the opaque token value.
    /// The plaintext value is returned to the client but never stored.
    pub token_hash: String,

    /// Principal this token was issued to.
    pub principal_id: String,

    /// When this token was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When this token expires. Expiry is checked lazily at lookup time.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl RefreshToken {
    /// Returns `true` if this token is expired as of `now`.
    ///
    /// The caller supplies the instant so that every check within one
    /// engine operation uses the same clock reading.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }

    /// Hash a token value using SHA-256.
    ///
    /// Used both when storing new tokens and when looking up tokens for
    /// consumption.
    #[must_use]
    pub fn hash_value(value: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Generate a cryptographically secure random token value.
    ///
    /// Returns a 256-bit random value encoded as base64url (43 characters).
    #[must_use]
    pub fn generate_value() -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
