//! Authentication configuration.
//!
//! This module provides the configuration types for the token lifecycle
//! engine: token lifetimes, the signing secret, transport mode selection,
//! and the rotation/invalidation switches.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! access_token_ttl = "15m"
//! refresh_token_ttl = "30d"
//! signing_secret = "..."
//! transport = "cookies"
//! blacklist_after_refresh = true
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root authentication configuration.
///
/// Durations are parsed with humantime syntax (`"15m"`, `"30d"`). The
/// signing secret has no default and must be provided before the
/// configuration validates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token lifetime.
    /// Shorter lifetimes are more secure but require more frequent refresh.
    #[serde(with = "humantime_serde")]
    pub access_token_ttl: Duration,

    /// Refresh token lifetime.
    /// Can be longer since refresh tokens are single-use and persisted.
    #[serde(with = "humantime_serde")]
    pub refresh_token_ttl: Duration,

    /// Secret used to sign and verify access tokens (HMAC).
    /// A single secret for the whole deployment; no per-token key material.
    pub signing_secret: String,

    /// How tokens travel between server and client.
    pub transport: TransportMode,

    /// Blacklist the access token presented alongside a refresh request.
    /// When enabled, the old access token stops validating as soon as the
    /// refresh completes, even though its own expiry has not passed.
    pub blacklist_after_refresh: bool,

    /// Move the principal's issued-at watermark on credential changes.
    /// When disabled, `invalidate_all_tokens` is a no-op.
    pub invalidate_on_credential_change: bool,

    /// Accept an expired (but otherwise valid) access token as identity
    /// proof on the refresh endpoint. Signature, watermark, and revocation
    /// checks still apply.
    pub allow_expired_access_on_refresh: bool,

    /// Cookie attributes used when `transport` is [`TransportMode::Cookies`].
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::from_secs(24 * 3600),
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600),
            signing_secret: String::new(),
            transport: TransportMode::Headers,
            blacklist_after_refresh: false,
            invalidate_on_credential_change: true,
            allow_expired_access_on_refresh: true,
            cookie: CookieConfig::default(),
        }
    }
}

/// Token transport selection.
///
/// A pure configuration switch evaluated by the transport adapter; the
/// lifecycle engine itself never inspects request transport details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Tokens travel in the `Access-Token` / `Refresh-Token` headers.
    Headers,
    /// Tokens travel in `access_token` / `refresh_token` cookies.
    Cookies,
}

/// Cookie attributes for cookie-based transport.
///
/// Both token cookies are always `HttpOnly` with the configured path, and
/// expire together with the refresh token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Name of the access token cookie.
    pub access_name: String,

    /// Name of the refresh token cookie.
    pub refresh_name: String,

    /// Cookie path.
    pub path: String,

    /// Set the `Secure` attribute (HTTPS-only).
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_name: "access_token".to_string(),
            refresh_name: "refresh_token".to_string(),
            path: "/".to_string(),
            secure: true,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

/// Minimum accepted signing secret length, in bytes.
const MIN_SECRET_LEN: usize = 32;

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The signing secret is missing or shorter than 32 bytes
    /// - Either TTL is below one second (expiry math is whole-second)
    /// - The access token outlives the refresh token
    /// - A cookie name or the cookie path is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.is_empty() {
            return Err(ConfigError::Missing("signing_secret".to_string()));
        }

        if self.signing_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "signing_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if self.access_token_ttl < Duration::from_secs(1) {
            return Err(ConfigError::InvalidValue(
                "access_token_ttl must be at least 1s".to_string(),
            ));
        }

        if self.refresh_token_ttl < Duration::from_secs(1) {
            return Err(ConfigError::InvalidValue(
                "refresh_token_ttl must be at least 1s".to_string(),
            ));
        }

        if self.access_token_ttl > self.refresh_token_ttl {
            return Err(ConfigError::InvalidValue(
                "access_token_ttl must not exceed refresh_token_ttl".to_string(),
            ));
        }

        if self.cookie.access_name.is_empty() || self.cookie.refresh_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "cookie names cannot be empty".to_string(),
            ));
        }

        if self.cookie.path.is_empty() {
            return Err(ConfigError::InvalidValue(
                "cookie path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
