//! Access token encoding and decoding.
//!
//! Signing is deterministic HMAC (HS256) with the single configured secret;
//! there is no per-token key material. Decoding verifies the signature,
//! optionally the expiry, and always the presence of the issued-at claim:
//! `iat` is what the invalidation watermark compares against, so it is
//! checked independently rather than trusted to exist.
//!
//! The caller supplies the instant expiry is checked against; the codec
//! never reads a clock of its own, so all timestamps within one engine
//! operation derive from a single reading.
//!
//! Decoding with `verify_expiry = false` exists for diagnostics and for the
//! refresh endpoint's identity proof. It must never be used to authorize a
//! protected request.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::AccessTokenClaims;

/// Encodes and decodes signed access tokens.
///
/// Thread-safe (`Send + Sync`); one instance is shared across requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Decoded payload before the issued-at presence check.
///
/// `iat` is optional here so its absence surfaces as
/// [`AuthError::MissingIssuedAt`] instead of a generic parse failure.
#[derive(Debug, Deserialize)]
struct DecodedClaims {
    sub: String,
    exp: i64,
    iat: Option<i64>,
    #[serde(flatten)]
    custom: serde_json::Map<String, serde_json::Value>,
}

impl TokenCodec {
    /// Creates a codec from the configured signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Encodes claims into a signed token string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encoding`] only when the claim input cannot be
    /// serialized.
    pub fn encode(&self, claims: &AccessTokenClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::encoding(e.to_string()))
    }

    /// Decodes and verifies a token string.
    ///
    /// Expiry is compared against the supplied `now`, without leeway: a
    /// token is expired once `now` strictly exceeds its `exp` claim.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidSignature`] if the token is malformed or the
    ///   signature does not verify
    /// - [`AuthError::Expired`] if `verify_expiry` is set and `exp` is past
    /// - [`AuthError::MissingIssuedAt`] if the `iat` claim is absent
    pub fn decode(
        &self,
        token: &str,
        verify_expiry: bool,
        now: OffsetDateTime,
    ) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock reading, not
        // against the library's own notion of "now".
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data =
            decode::<DecodedClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "Failed to decode token");
                AuthError::InvalidSignature
            })?;

        let claims = data.claims;
        let iat = claims.iat.ok_or(AuthError::MissingIssuedAt)?;

        if verify_expiry && now.unix_timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(AccessTokenClaims {
            sub: claims.sub,
            exp: claims.exp,
            iat,
            custom: claims.custom,
        })
    }
}
