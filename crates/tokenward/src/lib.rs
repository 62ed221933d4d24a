//! # tokenward
//!
//! Token lifecycle core: short-lived signed access tokens paired with
//! longer-lived, single-use refresh tokens.
//!
//! This crate provides:
//! - Access token encoding/decoding with a single configured HMAC secret
//! - Token pair issuance with consistent expiry math
//! - Validation against expiry, the principal's invalidation watermark,
//!   and an optional revocation blacklist
//! - Refresh token rotation with an atomic single-use guarantee
//!
//! ## Overview
//!
//! The engine is transport-agnostic: raw token strings in, signed/opaque
//! strings out. Everything durable lives behind the [`storage`] traits;
//! persistence of the principal's account, password hashing, and request
//! routing are external collaborators. Header/cookie delivery lives in the
//! companion `tokenward-http` crate, in-memory stores in
//! `tokenward-memory`.
//!
//! ## Modules
//!
//! - [`clock`] - Time source abstraction (one reading per operation)
//! - [`config`] - Lifecycle configuration and validation
//! - [`error`] - Error taxonomy
//! - [`storage`] - Storage traits for refresh tokens, blacklist, principals
//! - [`token`] - Token codec and the lifecycle engine
//! - [`types`] - Domain records

pub mod clock;
pub mod config;
pub mod error;
pub mod storage;
pub mod token;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, ConfigError, CookieConfig, TransportMode};
pub use error::AuthError;
pub use storage::{BlacklistStore, PrincipalStore, RefreshTokenStore};
pub use token::{TokenCodec, TokenPolicy, TokenService};
pub use types::{AccessTokenClaims, BlacklistEntry, Principal, RefreshToken, TokenPair};

/// Type alias for token lifecycle results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use tokenward::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::{AuthConfig, ConfigError, CookieConfig, TransportMode};
    pub use crate::error::AuthError;
    pub use crate::storage::{BlacklistStore, PrincipalStore, RefreshTokenStore};
    pub use crate::token::{TokenCodec, TokenPolicy, TokenService};
    pub use crate::types::{AccessTokenClaims, BlacklistEntry, Principal, RefreshToken, TokenPair};
}
