//! Principal record.
//!
//! The principal is the authenticated identity tokens are issued for.
//! The account itself (credentials, profile, persistence) lives with an
//! external collaborator; the engine only needs the identifier, any custom
//! claims the domain wants inside access tokens, and the invalidation
//! watermark.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An authenticated principal as seen by the token lifecycle engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier, carried as the `sub` claim of access tokens.
    pub id: String,

    /// Custom claims merged into the signed payload at issuance.
    ///
    /// Supplied by the caller's domain object; the engine treats the
    /// mapping as opaque.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub custom_claims: serde_json::Map<String, serde_json::Value>,

    /// Issued-at watermark.
    ///
    /// Access tokens minted strictly before this instant are rejected.
    /// Moved to "now" when credentials change.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub token_watermark: Option<OffsetDateTime>,
}

impl Principal {
    /// Creates a principal with no custom claims and no watermark.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            custom_claims: serde_json::Map::new(),
            token_watermark: None,
        }
    }

    /// Sets the custom claims merged into issued tokens.
    #[must_use]
    pub fn with_custom_claims(
        mut self,
        claims: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.custom_claims = claims;
        self
    }

    /// Returns `true` if a token issued at `issued_at` (Unix seconds)
    /// predates the watermark and must be rejected.
    ///
    /// The comparison is strict: a token minted in the same second as the
    /// watermark update stays valid.
    #[must_use]
    pub fn rejects_issued_at(&self, issued_at: i64) -> bool {
        self.token_watermark
            .map(|wm| wm.unix_timestamp() > issued_at)
            .unwrap_or(false)
    }
}
