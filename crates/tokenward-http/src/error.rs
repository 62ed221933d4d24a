//! HTTP mapping for auth errors.
//!
//! Every validation failure maps to 401 with a body that is coarse-grained
//! by kind only; token contents never appear in responses. Store outages map
//! to 503 so clients can tell a retryable condition from a rejection.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokenward::AuthError;

/// Response-convertible wrapper around [`AuthError`].
///
/// Used as extractor rejection and handler error type.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Stable machine-readable error kind.
    error: &'static str,
    /// Coarse human-readable description.
    message: String,
}

/// Stable error code for each error kind.
#[must_use]
pub fn error_code(error: &AuthError) -> &'static str {
    match error {
        AuthError::InvalidSignature => "invalid_token",
        AuthError::Expired => "token_expired",
        AuthError::MissingIssuedAt => "invalid_token",
        AuthError::Unauthorized { .. } => "unauthorized",
        AuthError::Revoked => "token_revoked",
        AuthError::InvalidRefreshToken { .. } => "invalid_refresh_token",
        AuthError::StoreUnavailable { .. } => "store_unavailable",
        AuthError::Encoding { .. } | AuthError::Configuration { .. } => "server_error",
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: error_code(&self.0),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
