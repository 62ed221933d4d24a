//! Access token extractor.
//!
//! This module provides the Axum extractor protected routes use to turn the
//! incoming access token into a resolved principal.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use tokenward_http::{AccessAuth, AuthState};
//!
//! async fn protected_handler(AccessAuth(principal): AccessAuth) -> String {
//!     format!("Hello, {}!", principal.id)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tokenward::AuthError;
use tokenward::types::Principal;

use crate::error::ApiError;
use crate::state::AuthState;

/// Axum extractor that validates the access token and resolves its
/// principal.
///
/// The token is read through the configured transport (header or cookie)
/// and run through the full validation chain: signature, expiry, watermark,
/// blacklist.
///
/// # Errors
///
/// Rejects with [`ApiError`] (HTTP 401) when the token is missing, invalid,
/// expired, superseded by a credential change, or revoked.
pub struct AccessAuth(pub Principal);

impl<S> FromRequestParts<S> for AccessAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = auth_state
            .transport
            .extract_access(&parts.headers)
            .ok_or_else(|| ApiError(AuthError::unauthorized("missing access token")))?;

        let principal = auth_state
            .service
            .validate_access(&token)
            .await
            .map_err(ApiError)?;

        tracing::debug!(principal_id = %principal.id, "Access token validated");
        Ok(AccessAuth(principal))
    }
}
