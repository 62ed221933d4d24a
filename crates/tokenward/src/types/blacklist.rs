//! Blacklist entry for revoked access tokens.
//!
//! Access tokens are stateless, so revoking one before its natural expiry
//! requires a persisted denylist consulted on every validation. An entry
//! only needs to identify the token and remember when tracking it stops
//! mattering: once the token's own expiry passes, the entry is moot and may
//! be purged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A revoked access token marker as persisted by a [`BlacklistStore`].
///
/// [`BlacklistStore`]: crate::storage::BlacklistStore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    /// SHA-256 digest of the full signed token string.
    pub token_digest: String,

    /// The token's own expiry; the entry can be purged after this instant.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl BlacklistEntry {
    /// Computes the blacklist key for a signed token string.
    ///
    /// The full token string is digested rather than stored, so the
    /// blacklist never holds usable credentials.
    #[must_use]
    pub fn digest(token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns `true` if the entry outlived its token and may be purged.
    #[must_use]
    pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}
