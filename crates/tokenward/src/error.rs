//! Authentication error types.
//!
//! This module defines all error types that can occur while issuing,
//! validating, or rotating tokens. Validation failures are terminal for the
//! current request and map to HTTP 401; only [`AuthError::StoreUnavailable`]
//! is retryable.
//!
//! Error messages are coarse-grained by kind and never contain token
//! contents.

/// Errors that can occur during token lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token signature does not verify, or the token is malformed.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token's expiry claim is in the past.
    #[error("Token expired")]
    Expired,

    /// The token is missing the mandatory issued-at claim.
    #[error("Token missing issued-at claim")]
    MissingIssuedAt,

    /// The request lacks valid authentication credentials, or the token was
    /// issued before the principal's invalidation watermark.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The access token has been explicitly revoked (blacklisted).
    #[error("Token revoked")]
    Revoked,

    /// The refresh token is missing, expired, or already consumed.
    #[error("Invalid refresh token: {message}")]
    InvalidRefreshToken {
        /// Description of why the refresh token is invalid.
        message: String,
    },

    /// A durable store did not respond in time or failed transiently.
    ///
    /// This is the only error a caller may reasonably retry. It must never
    /// be turned into an authorization decision.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure.
        message: String,
    },

    /// Claim input could not be serialized into a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRefreshToken` error.
    #[must_use]
    pub fn invalid_refresh_token(message: impl Into<String>) -> Self {
        Self::InvalidRefreshToken {
            message: message.into(),
        }
    }

    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a validation failure (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature
                | Self::Expired
                | Self::MissingIssuedAt
                | Self::Unauthorized { .. }
                | Self::Revoked
                | Self::InvalidRefreshToken { .. }
        )
    }

    /// Returns `true` if the operation may be retried by the caller.
    ///
    /// Validation failures are terminal for the current request; only
    /// transient store failures qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidSignature
            | Self::Expired
            | Self::MissingIssuedAt
            | Self::Unauthorized { .. }
            | Self::Revoked
            | Self::InvalidRefreshToken { .. } => 401,
            Self::StoreUnavailable { .. } => 503,
            Self::Encoding { .. } | Self::Configuration { .. } => 500,
        }
    }
}
