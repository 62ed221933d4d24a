//! Access token claims and the issued token pair.

use serde::{Deserialize, Serialize};

/// Claims carried inside a signed access token.
///
/// `iat` is mandatory and checked independently of the signature during
/// decoding; it is what the principal's invalidation watermark is compared
/// against. Custom claims supplied by the principal are flattened into the
/// payload alongside the registered claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject: the principal identifier.
    pub sub: String,

    /// Expiration time (Unix seconds).
    pub exp: i64,

    /// Issued at (Unix seconds).
    pub iat: i64,

    /// Custom claims merged from the principal at issuance.
    #[serde(flatten)]
    pub custom: serde_json::Map<String, serde_json::Value>,
}

/// One issued access/refresh token pair.
///
/// Ephemeral: only the refresh token's hashed row persists. The pair is
/// handed to the transport adapter for delivery and then dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Signed access token string.
    pub access_token: String,

    /// Opaque refresh token value.
    pub refresh_token: String,

    /// Access token expiry (Unix seconds), echoed to clients so they can
    /// schedule a refresh without decoding the token.
    pub expires_at: i64,
}
