//! Token transport strategies.
//!
//! The engine hands out raw strings; how they travel is a transport
//! concern selected once by configuration. Exactly two strategies exist:
//! response/request headers, or scoped HttpOnly cookies. Handlers and
//! extractors go through the [`TokenTransport`] trait and never branch on
//! the mode themselves.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{COOKIE, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use axum_extra::extract::cookie::CookieJar;
use cookie::Cookie;
use tokenward::config::{AuthConfig, CookieConfig, TransportMode};
use tokenward::types::TokenPair;

/// Request/response header carrying the access token.
pub const ACCESS_TOKEN_HEADER: HeaderName = HeaderName::from_static("access-token");

/// Request/response header carrying the refresh token.
pub const REFRESH_TOKEN_HEADER: HeaderName = HeaderName::from_static("refresh-token");

/// Response header carrying the access token expiry (Unix seconds).
pub const EXPIRE_AT_HEADER: HeaderName = HeaderName::from_static("expire-at");

/// How tokens move between the server and its clients.
pub trait TokenTransport: Send + Sync {
    /// Pulls the access token out of request headers.
    fn extract_access(&self, headers: &HeaderMap) -> Option<String>;

    /// Pulls the refresh token out of request headers.
    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String>;

    /// Response headers that deliver a freshly issued pair.
    fn deliver(&self, pair: &TokenPair) -> Vec<(HeaderName, HeaderValue)>;

    /// Response headers that remove any previously delivered tokens.
    fn clear(&self) -> Vec<(HeaderName, HeaderValue)>;
}

/// Builds the transport matching the configured mode.
#[must_use]
pub fn transport_from_config(config: &AuthConfig) -> Arc<dyn TokenTransport> {
    match config.transport {
        TransportMode::Headers => Arc::new(HeaderTransport),
        TransportMode::Cookies => Arc::new(CookieTransport::new(
            config.cookie.clone(),
            config.refresh_token_ttl,
        )),
    }
}

// =============================================================================
// Header Transport
// =============================================================================

/// Tokens travel in `Access-Token` / `Refresh-Token` headers; responses also
/// carry `Expire-At` so clients can schedule a refresh without decoding the
/// access token.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderTransport;

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

impl TokenTransport for HeaderTransport {
    fn extract_access(&self, headers: &HeaderMap) -> Option<String> {
        header_string(headers, &ACCESS_TOKEN_HEADER)
    }

    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String> {
        header_string(headers, &REFRESH_TOKEN_HEADER)
    }

    fn deliver(&self, pair: &TokenPair) -> Vec<(HeaderName, HeaderValue)> {
        let mut out = Vec::with_capacity(3);
        if let Ok(value) = HeaderValue::try_from(pair.access_token.as_str()) {
            out.push((ACCESS_TOKEN_HEADER, value));
        }
        if let Ok(value) = HeaderValue::try_from(pair.refresh_token.as_str()) {
            out.push((REFRESH_TOKEN_HEADER, value));
        }
        if let Ok(value) = HeaderValue::try_from(pair.expires_at.to_string()) {
            out.push((EXPIRE_AT_HEADER, value));
        }
        out
    }

    fn clear(&self) -> Vec<(HeaderName, HeaderValue)> {
        // Header-borne tokens live client-side; nothing to clear.
        Vec::new()
    }
}

// =============================================================================
// Cookie Transport
// =============================================================================

/// Tokens travel in two scoped cookies.
///
/// Both cookies are HttpOnly (not accessible to scripts) on the configured
/// path, and live as long as the refresh token: the access token inside
/// goes stale earlier, but the cookie must survive until the last moment a
/// refresh could still use it.
#[derive(Debug, Clone)]
pub struct CookieTransport {
    config: CookieConfig,
    refresh_ttl: Duration,
}

impl CookieTransport {
    /// Creates a cookie transport from cookie attributes and the refresh
    /// token lifetime.
    #[must_use]
    pub fn new(config: CookieConfig, refresh_ttl: Duration) -> Self {
        Self {
            config,
            refresh_ttl,
        }
    }

    fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
        if !headers.contains_key(COOKIE) {
            return None;
        }
        let jar = CookieJar::from_headers(headers);
        jar.get(name)
            .map(|cookie| cookie.value().trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn build_cookie(&self, name: &str, value: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), value.to_string()))
            .http_only(true)
            .secure(self.config.secure)
            .path(self.config.path.clone())
            .max_age(time::Duration::seconds(self.refresh_ttl.as_secs() as i64))
            .build()
    }

    fn build_clear_cookie(&self, name: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), String::new()))
            .http_only(true)
            .secure(self.config.secure)
            .path(self.config.path.clone())
            .max_age(time::Duration::ZERO)
            .build()
    }
}

impl TokenTransport for CookieTransport {
    fn extract_access(&self, headers: &HeaderMap) -> Option<String> {
        Self::cookie_value(headers, &self.config.access_name)
    }

    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String> {
        Self::cookie_value(headers, &self.config.refresh_name)
    }

    fn deliver(&self, pair: &TokenPair) -> Vec<(HeaderName, HeaderValue)> {
        let cookies = [
            self.build_cookie(&self.config.access_name, &pair.access_token),
            self.build_cookie(&self.config.refresh_name, &pair.refresh_token),
        ];

        cookies
            .into_iter()
            .filter_map(|cookie| {
                HeaderValue::try_from(cookie.to_string())
                    .ok()
                    .map(|value| (SET_COOKIE, value))
            })
            .collect()
    }

    fn clear(&self) -> Vec<(HeaderName, HeaderValue)> {
        let cookies = [
            self.build_clear_cookie(&self.config.access_name),
            self.build_clear_cookie(&self.config.refresh_name),
        ];

        cookies
            .into_iter()
            .filter_map(|cookie| {
                HeaderValue::try_from(cookie.to_string())
                    .ok()
                    .map(|value| (SET_COOKIE, value))
            })
            .collect()
    }
}
