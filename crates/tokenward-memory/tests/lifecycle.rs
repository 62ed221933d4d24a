//! Integration tests for the token lifecycle against the in-memory stores.
//!
//! These tests drive the real engine end to end: issuance, validation,
//! rotation under contention, watermark invalidation, and revocation.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use time::{Duration, OffsetDateTime};
use tokenward::clock::ManualClock;
use tokenward::config::AuthConfig;
use tokenward::token::{TokenCodec, TokenPolicy, TokenService};
use tokenward::types::Principal;
use tokenward::AuthError;
use tokenward::PrincipalStore;
use tokenward_memory::{
    InMemoryBlacklistStore, InMemoryPrincipalStore, InMemoryRefreshTokenStore,
};

struct Harness {
    service: Arc<TokenService>,
    clock: Arc<ManualClock>,
    principals: Arc<InMemoryPrincipalStore>,
}

fn test_config() -> AuthConfig {
    AuthConfig {
        signing_secret: "0123456789abcdef0123456789abcdef".to_string(),
        ..AuthConfig::default()
    }
}

fn create_harness(config: AuthConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
    ));
    let principals = Arc::new(InMemoryPrincipalStore::new());
    principals.upsert(Principal::new("user-1"));

    let service = Arc::new(TokenService::new(
        Arc::new(TokenCodec::new(&config.signing_secret)),
        Arc::new(InMemoryRefreshTokenStore::new()),
        Arc::new(InMemoryBlacklistStore::new()),
        principals.clone(),
        clock.clone(),
        TokenPolicy::from(&config),
    ));

    Harness {
        service,
        clock,
        principals,
    }
}

#[tokio::test]
async fn issued_pair_validates_at_issuance_time() {
    let h = create_harness(test_config());
    let principal = Principal::new("user-1");

    let pair = h.service.issue_pair(&principal).await.unwrap();
    let resolved = h.service.validate_access(&pair.access_token).await.unwrap();
    assert_eq!(resolved.id, "user-1");
}

#[tokio::test]
async fn access_token_expires_after_ttl() {
    let mut config = test_config();
    config.access_token_ttl = StdDuration::from_secs(60);
    let h = create_harness(config);

    let pair = h.service.issue_pair(&Principal::new("user-1")).await.unwrap();

    // Exactly at expiry the token still passes; one second later it is gone.
    h.clock.advance(Duration::seconds(60));
    h.service.validate_access(&pair.access_token).await.unwrap();

    h.clock.advance(Duration::seconds(1));
    let err = h
        .service
        .validate_access(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Expired));
}

#[tokio::test]
async fn concurrent_refresh_has_exactly_one_winner() {
    let h = create_harness(test_config());
    let principal = Principal::new("user-1");
    let pair = h.service.issue_pair(&principal).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = h.service.clone();
        let principal = principal.clone();
        let value = pair.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            service.refresh(&principal, &value, None).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(matches!(e, AuthError::InvalidRefreshToken { .. })),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn watermark_invalidates_only_older_tokens() {
    let h = create_harness(test_config());
    let old_pair = h.service.issue_pair(&Principal::new("user-1")).await.unwrap();

    h.clock.advance(Duration::seconds(1));
    h.service.invalidate_all_tokens("user-1").await.unwrap();

    let err = h
        .service
        .validate_access(&old_pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized { .. }));

    // Tokens minted after the credential change validate. The principal
    // record now carries the watermark, like a freshly loaded account would.
    h.clock.advance(Duration::seconds(1));
    let refreshed = h
        .principals
        .find_by_id("user-1")
        .await
        .unwrap()
        .expect("principal exists");
    let new_pair = h.service.issue_pair(&refreshed).await.unwrap();
    h.service.validate_access(&new_pair.access_token).await.unwrap();
}

#[tokio::test]
async fn blacklist_after_refresh_kills_outgoing_access_token() {
    let mut config = test_config();
    config.blacklist_after_refresh = true;
    let h = create_harness(config);
    let principal = Principal::new("user-1");

    let pair = h.service.issue_pair(&principal).await.unwrap();
    h.service
        .refresh(&principal, &pair.refresh_token, Some(&pair.access_token))
        .await
        .unwrap();

    // Its exp has not passed, but the token no longer validates.
    let err = h
        .service
        .validate_access(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Revoked));
}

#[tokio::test]
async fn short_ttl_lifecycle_scenario() {
    let mut config = test_config();
    config.access_token_ttl = StdDuration::from_secs(1);
    config.refresh_token_ttl = StdDuration::from_secs(60);
    let h = create_harness(config);
    let principal = Principal::new("user-1");

    let pair = h.service.issue_pair(&principal).await.unwrap();
    h.service.validate_access(&pair.access_token).await.unwrap();

    h.clock.advance(Duration::seconds(2));

    let err = h
        .service
        .validate_access(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Expired));

    // The 60s refresh token is still live; rotation produces a pair that
    // validates immediately.
    let new_pair = h
        .service
        .refresh(&principal, &pair.refresh_token, Some(&pair.access_token))
        .await
        .unwrap();
    h.service
        .validate_access(&new_pair.access_token)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_token_expires_unused() {
    let mut config = test_config();
    config.refresh_token_ttl = StdDuration::from_secs(60);
    config.access_token_ttl = StdDuration::from_secs(30);
    let h = create_harness(config);
    let principal = Principal::new("user-1");

    let pair = h.service.issue_pair(&principal).await.unwrap();

    h.clock.advance(Duration::seconds(61));
    let err = h
        .service
        .refresh(&principal, &pair.refresh_token, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken { .. }));
}

#[tokio::test]
async fn revoked_access_token_fails_until_expiry_passes() {
    let h = create_harness(test_config());
    let pair = h.service.issue_pair(&Principal::new("user-1")).await.unwrap();

    h.service.revoke_access(&pair.access_token).await.unwrap();
    let err = h
        .service
        .validate_access(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Revoked));

    // Once the token's own expiry passes, the expiry check fires first;
    // the blacklist entry is moot from here on.
    h.clock.advance(Duration::hours(25));
    let err = h
        .service
        .validate_access(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Expired));
}
