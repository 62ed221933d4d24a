//! Principal lookup trait.
//!
//! The principal's account data is owned by an external collaborator; the
//! engine only needs to resolve an identifier to a [`Principal`] record and
//! to persist watermark updates when credentials change.
//!
//! [`Principal`]: crate::types::Principal

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::Principal;

/// Storage trait for principal resolution and watermark updates.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Resolves a principal by its identifier.
    ///
    /// Returns `None` when no such principal exists (the caller decides how
    /// that maps into an authorization failure).
    async fn find_by_id(&self, principal_id: &str) -> AuthResult<Option<Principal>>;

    /// Persists a new issued-at watermark for the principal.
    ///
    /// Every access token minted strictly before `at` becomes invalid on
    /// its next validation.
    async fn set_token_watermark(&self, principal_id: &str, at: OffsetDateTime) -> AuthResult<()>;
}
