//! Refresh token storage trait.
//!
//! # Security Considerations
//!
//! - Token values are stored as SHA-256 hashes only
//! - Consumption must be atomic: exactly one concurrent caller wins
//! - Expired rows should be cleaned up periodically

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::RefreshToken;

/// Storage trait for refresh tokens.
///
/// The single correctness-critical operation is [`consume`]: the
/// lookup-then-destroy sequence of a refresh must be atomic with respect to
/// concurrent refresh attempts using the same value. The store enforces this
/// (atomic conditional delete), not the engine, since the store may be
/// distributed.
///
/// [`consume`]: RefreshTokenStore::consume
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Stores a new refresh token row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be stored (duplicate hash,
    /// storage unavailable).
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Atomically removes and returns the live row matching
    /// `(principal_id, token_hash)`.
    ///
    /// A row is live when it exists and is not expired as of `now`. Under
    /// concurrent calls with the same arguments, exactly one caller receives
    /// `Some(row)`; every other caller receives `None`. Expired rows are
    /// treated as absent (and may be deleted as a side effect).
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures, never for a missing or
    /// expired row.
    async fn consume(
        &self,
        principal_id: &str,
        token_hash: &str,
        now: OffsetDateTime,
    ) -> AuthResult<Option<RefreshToken>>;

    /// Removes every refresh token belonging to a principal.
    ///
    /// Used when all of a principal's sessions must end at once (credential
    /// compromise, account closure).
    ///
    /// # Returns
    ///
    /// Returns the number of rows removed.
    async fn revoke_by_principal(&self, principal_id: &str) -> AuthResult<u64>;

    /// Deletes rows whose expiry has passed as of `now`.
    ///
    /// Housekeeping only; expiry is already checked lazily at consumption.
    ///
    /// # Returns
    ///
    /// Returns the number of rows deleted.
    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64>;
}
