//! # tokenward-http
//!
//! Axum transport adapter for the `tokenward` token lifecycle core.
//!
//! This crate provides:
//! - Header and cookie token transports behind one [`TokenTransport`] trait
//! - The [`AccessAuth`] extractor for protected routes
//! - Refresh and revoke endpoint handlers
//! - HTTP mapping for the core error taxonomy (401 for validation
//!   failures, 503 for store outages)
//!
//! The transport mode is a pure configuration switch: handlers and
//! extractors read and write tokens through the trait and never inspect
//! the mode themselves.

mod error;
mod extract;
mod handlers;
mod state;
mod transport;

pub use error::{ApiError, error_code};
pub use extract::AccessAuth;
pub use handlers::{issue_response, refresh_handler, revoke_handler, router};
pub use state::AuthState;
pub use transport::{
    ACCESS_TOKEN_HEADER, CookieTransport, EXPIRE_AT_HEADER, HeaderTransport, REFRESH_TOKEN_HEADER,
    TokenTransport, transport_from_config,
};
