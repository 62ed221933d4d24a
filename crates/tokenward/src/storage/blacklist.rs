//! Blacklist storage trait.
//!
//! Tracks access tokens revoked before their natural expiry. Entries are
//! keyed by token digest and carry the token's own expiry so the store can
//! purge records that no longer matter.
//!
//! # Consistency
//!
//! Inserts need no read-your-writes guarantee: it is sufficient that an
//! entry becomes visible by the time of the *next* request using the
//! revoked token. No request is required to observe its own just-inserted
//! entry.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;

/// Storage trait for revoked access token digests.
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Marks an access token digest as revoked.
    ///
    /// `expires_at` is the token's original expiry; the entry may be purged
    /// once that instant passes.
    ///
    /// # Idempotency
    ///
    /// Inserting an already-present digest succeeds without error.
    async fn insert(&self, token_digest: &str, expires_at: OffsetDateTime) -> AuthResult<()>;

    /// Checks whether a token digest is currently revoked.
    ///
    /// Entries whose expiry has passed as of `now` count as absent.
    ///
    /// # Performance
    ///
    /// Called on every validated request; implementations should keep this
    /// fast (indexes, caching).
    async fn contains(&self, token_digest: &str, now: OffsetDateTime) -> AuthResult<bool>;

    /// Deletes entries whose expiry has passed as of `now`.
    ///
    /// # Returns
    ///
    /// Returns the number of entries deleted.
    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64>;
}
