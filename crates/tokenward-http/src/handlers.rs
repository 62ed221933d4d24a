//! Token endpoint handlers.
//!
//! Two endpoints own the token lifecycle over HTTP:
//!
//! - `POST /auth/refresh` rotates a refresh token into a fresh pair
//! - `POST /auth/revoke` blacklists the presented access token
//!
//! Issuance itself has no route here: the caller authenticates the
//! principal elsewhere (credentials, SSO, anything) and then calls
//! [`issue_response`] to mint and deliver the first pair.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::json;
use tokenward::AuthError;
use tokenward::types::{Principal, TokenPair};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AuthState;
use crate::transport::TokenTransport;

/// Builds a router exposing the refresh and revoke endpoints.
#[must_use]
pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/refresh", post(refresh_handler))
        .route("/auth/revoke", post(revoke_handler))
        .with_state(state)
}

/// Mints a token pair for an already-authenticated principal and builds the
/// delivery response.
///
/// # Errors
///
/// Returns an error if issuance fails (claim encoding, refresh row
/// persistence).
pub async fn issue_response(
    state: &AuthState,
    principal: &Principal,
) -> Result<Response, ApiError> {
    let pair = state.service.issue_pair(principal).await.map_err(ApiError)?;

    info!(principal_id = %principal.id, "Token pair issued");
    Ok(deliver_pair(
        state.transport.as_ref(),
        &pair,
        "Signed in",
    ))
}

/// Refresh endpoint handler.
///
/// The caller proves its identity with the access token (expired tokens
/// are acceptable when the policy allows it) and presents the refresh
/// token through the same transport. On success the consumed refresh token
/// is replaced and the new pair is delivered exactly like on issue.
pub async fn refresh_handler(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let Some(access) = state.transport.extract_access(&headers) else {
        return ApiError(AuthError::unauthorized("missing access token")).into_response();
    };

    let principal = match state.service.authenticate_for_refresh(&access).await {
        Ok(principal) => principal,
        Err(e) => {
            warn!(error = %e, "Refresh caller failed authentication");
            return ApiError(e).into_response();
        }
    };

    let Some(refresh_value) = state.transport.extract_refresh(&headers) else {
        return ApiError(AuthError::invalid_refresh_token("refresh token missing"))
            .into_response();
    };

    match state
        .service
        .refresh(&principal, &refresh_value, Some(&access))
        .await
    {
        Ok(pair) => {
            info!(principal_id = %principal.id, "Token pair refreshed");
            deliver_pair(state.transport.as_ref(), &pair, "Token refreshed")
        }
        Err(e) => {
            warn!(principal_id = %principal.id, error = %e, "Refresh failed");
            ApiError(e).into_response()
        }
    }
}

/// Revoke endpoint handler.
///
/// Blacklists the presented access token until its natural expiry and
/// clears any token cookies. The token must still validate; revoking an
/// already-invalid token is indistinguishable from a failed request.
pub async fn revoke_handler(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let Some(access) = state.transport.extract_access(&headers) else {
        return ApiError(AuthError::unauthorized("missing access token")).into_response();
    };

    let principal = match state.service.validate_access(&access).await {
        Ok(principal) => principal,
        Err(e) => return ApiError(e).into_response(),
    };

    match state.service.revoke_access(&access).await {
        Ok(()) => {
            info!(principal_id = %principal.id, "Access token revoked");
            let mut response =
                (StatusCode::OK, Json(json!({ "message": "Token revoked" }))).into_response();
            for (name, value) in state.transport.clear() {
                response.headers_mut().append(name, value);
            }
            response
        }
        Err(e) => {
            warn!(principal_id = %principal.id, error = %e, "Revocation failed");
            ApiError(e).into_response()
        }
    }
}

/// Builds a 200 response with the pair applied through the transport.
fn deliver_pair(transport: &dyn TokenTransport, pair: &TokenPair, message: &str) -> Response {
    let mut response = (
        StatusCode::OK,
        Json(json!({ "message": message, "expiresAt": pair.expires_at })),
    )
        .into_response();

    for (name, value) in transport.deliver(pair) {
        response.headers_mut().append(name, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::AccessAuth;
    use crate::transport::{ACCESS_TOKEN_HEADER, EXPIRE_AT_HEADER, REFRESH_TOKEN_HEADER};
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;
    use time::{Duration, OffsetDateTime};
    use tokenward::clock::ManualClock;
    use tokenward::config::{AuthConfig, TransportMode};
    use tokenward::types::TokenPair;
    use tokenward_memory::{
        InMemoryBlacklistStore, InMemoryPrincipalStore, InMemoryRefreshTokenStore,
    };
    use tower::ServiceExt;

    struct Harness {
        state: AuthState,
        clock: Arc<ManualClock>,
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            signing_secret: "0123456789abcdef0123456789abcdef".to_string(),
            blacklist_after_refresh: true,
            ..AuthConfig::default()
        }
    }

    fn create_harness(config: AuthConfig) -> Harness {
        let clock = Arc::new(ManualClock::new(
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        ));
        let principals = Arc::new(InMemoryPrincipalStore::new());
        principals.upsert(Principal::new("user-1"));

        let state = AuthState::from_config(
            &config,
            Arc::new(InMemoryRefreshTokenStore::new()),
            Arc::new(InMemoryBlacklistStore::new()),
            principals,
            clock.clone(),
        );

        Harness { state, clock }
    }

    async fn issue(h: &Harness) -> TokenPair {
        h.state
            .service
            .issue_pair(&Principal::new("user-1"))
            .await
            .unwrap()
    }

    fn refresh_request_headers(pair: &TokenPair) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/refresh")
            .header(&ACCESS_TOKEN_HEADER, pair.access_token.as_str())
            .header(&REFRESH_TOKEN_HEADER, pair.refresh_token.as_str())
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_returns_new_pair_in_headers() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;

        let response = router(h.state.clone())
            .oneshot(refresh_request_headers(&pair))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        let new_access = headers.get(&ACCESS_TOKEN_HEADER).unwrap().to_str().unwrap();
        let new_refresh = headers
            .get(&REFRESH_TOKEN_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(headers.contains_key(&EXPIRE_AT_HEADER));
        assert_ne!(new_refresh, pair.refresh_token);

        // The replacement access token validates.
        h.state.service.validate_access(new_access).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_accepts_expired_access_token() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;

        h.clock.advance(Duration::hours(25));

        let response = router(h.state.clone())
            .oneshot(refresh_request_headers(&pair))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_replay_is_rejected() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;
        let app = router(h.state.clone());

        let first = app
            .clone()
            .oneshot(refresh_request_headers(&pair))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // Old access token is blacklisted and the refresh token consumed;
        // replaying the same request now fails.
        let second = app.oneshot(refresh_request_headers(&pair)).await.unwrap();
        assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_missing_refresh_token() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/refresh")
            .header(&ACCESS_TOKEN_HEADER, pair.access_token.as_str())
            .body(Body::empty())
            .unwrap();

        let response = router(h.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid_refresh_token");
    }

    #[tokio::test]
    async fn test_refresh_missing_access_token() {
        let h = create_harness(test_config());

        let request = Request::builder()
            .method("POST")
            .uri("/auth/refresh")
            .body(Body::empty())
            .unwrap();

        let response = router(h.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_with_cookie_transport() {
        let mut config = test_config();
        config.transport = TransportMode::Cookies;
        config.cookie.secure = false;
        let h = create_harness(config);
        let pair = issue(&h).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/refresh")
            .header(
                COOKIE,
                format!(
                    "access_token={}; refresh_token={}",
                    pair.access_token, pair.refresh_token
                ),
            )
            .body(Body::empty())
            .unwrap();

        let response = router(h.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
        assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
    }

    #[tokio::test]
    async fn test_revoke_blacklists_token() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/revoke")
            .header(&ACCESS_TOKEN_HEADER, pair.access_token.as_str())
            .body(Body::empty())
            .unwrap();

        let response = router(h.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let err = h
            .state
            .service
            .validate_access(&pair.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Revoked));
    }

    #[tokio::test]
    async fn test_protected_route_with_extractor() {
        let h = create_harness(test_config());
        let pair = issue(&h).await;

        async fn whoami(AccessAuth(principal): AccessAuth) -> String {
            principal.id
        }

        let app = Router::new()
            .route("/whoami", get(whoami))
            .with_state(h.state.clone());

        let request = Request::builder()
            .uri("/whoami")
            .header(&ACCESS_TOKEN_HEADER, pair.access_token.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"user-1");

        // No token: 401.
        let request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_issue_response_delivers_pair() {
        let h = create_harness(test_config());

        let response = issue_response(&h.state, &Principal::new("user-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(&ACCESS_TOKEN_HEADER));
        assert!(response.headers().contains_key(&REFRESH_TOKEN_HEADER));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["expiresAt"].is_i64());
    }

    #[tokio::test]
    async fn test_short_ttl_refresh_scenario() {
        // 1s access / 60s refresh: expired access still refreshes while the
        // refresh token lives.
        let mut config = test_config();
        config.access_token_ttl = StdDuration::from_secs(1);
        config.refresh_token_ttl = StdDuration::from_secs(60);
        let h = create_harness(config);
        let pair = issue(&h).await;

        h.clock.advance(Duration::seconds(2));

        let err = h
            .state
            .service
            .validate_access(&pair.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Expired));

        let response = router(h.state.clone())
            .oneshot(refresh_request_headers(&pair))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let new_access = response
            .headers()
            .get(&ACCESS_TOKEN_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        h.state.service.validate_access(new_access).await.unwrap();
    }
}
