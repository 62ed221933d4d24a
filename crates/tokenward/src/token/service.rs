//! Token lifecycle engine.
//!
//! This module provides the service that drives the whole token lifecycle:
//!
//! - Issuing access/refresh token pairs
//! - Validating access tokens against expiry, watermark, and blacklist
//! - Rotating refresh tokens on use (single-use guarantee)
//! - Invalidating previously issued tokens after credential changes
//!
//! # Usage
//!
//! ```ignore
//! use tokenward::token::{TokenCodec, TokenPolicy, TokenService};
//!
//! let service = TokenService::new(
//!     codec, refresh_store, blacklist_store, principal_store, clock, policy,
//! );
//!
//! let pair = service.issue_pair(&principal).await?;
//! let principal = service.validate_access(&pair.access_token).await?;
//! ```
//!
//! The engine is request-scoped and stateless aside from the stores: it
//! performs no background work and holds no long-lived in-process state, so
//! it is safe under arbitrary concurrent request handling as long as store
//! operations are atomic.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::storage::{BlacklistStore, PrincipalStore, RefreshTokenStore};
use crate::token::codec::TokenCodec;
use crate::types::{AccessTokenClaims, BlacklistEntry, Principal, RefreshToken, TokenPair};

/// Lifecycle policy derived from [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    /// Access token lifetime.
    pub access_ttl: time::Duration,

    /// Refresh token lifetime.
    pub refresh_ttl: time::Duration,

    /// Blacklist the access token presented alongside a refresh request.
    pub blacklist_after_refresh: bool,

    /// Whether `invalidate_all_tokens` moves the watermark at all.
    pub invalidate_on_credential_change: bool,

    /// Accept an expired access token as identity proof on refresh.
    pub allow_expired_access_on_refresh: bool,
}

impl From<&AuthConfig> for TokenPolicy {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access_ttl: time::Duration::seconds(config.access_token_ttl.as_secs() as i64),
            refresh_ttl: time::Duration::seconds(config.refresh_token_ttl.as_secs() as i64),
            blacklist_after_refresh: config.blacklist_after_refresh,
            invalidate_on_credential_change: config.invalidate_on_credential_change,
            allow_expired_access_on_refresh: config.allow_expired_access_on_refresh,
        }
    }
}

/// Token lifecycle engine.
pub struct TokenService {
    /// Codec for signing and verifying access tokens.
    codec: Arc<TokenCodec>,

    /// Refresh token persistence.
    refresh_store: Arc<dyn RefreshTokenStore>,

    /// Revoked access token persistence.
    blacklist_store: Arc<dyn BlacklistStore>,

    /// Principal resolution and watermark updates.
    principal_store: Arc<dyn PrincipalStore>,

    /// Time source, read once per logical operation.
    clock: Arc<dyn Clock>,

    /// Lifecycle policy.
    policy: TokenPolicy,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub fn new(
        codec: Arc<TokenCodec>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        blacklist_store: Arc<dyn BlacklistStore>,
        principal_store: Arc<dyn PrincipalStore>,
        clock: Arc<dyn Clock>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            codec,
            refresh_store,
            blacklist_store,
            principal_store,
            clock,
            policy,
        }
    }

    /// Returns the active lifecycle policy.
    #[must_use]
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issues a new access/refresh token pair for a principal.
    ///
    /// All timestamps derive from a single clock reading: `iat = now`,
    /// access expiry `now + access_ttl`, refresh expiry `now + refresh_ttl`.
    /// The principal's custom claims are merged into the signed payload.
    /// Only the refresh token's hashed row is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if claim encoding fails or the refresh row cannot
    /// be stored.
    pub async fn issue_pair(&self, principal: &Principal) -> AuthResult<TokenPair> {
        self.issue_pair_inner(principal, false, false).await
    }

    /// Issues a pair whose access and/or refresh expiry is already in the
    /// past.
    ///
    /// Exists so failure-path tests can exercise expired-token handling
    /// without waiting on a real clock. Production callers must never
    /// request this.
    pub async fn issue_pair_backdated(
        &self,
        principal: &Principal,
        expired_access: bool,
        expired_refresh: bool,
    ) -> AuthResult<TokenPair> {
        self.issue_pair_inner(principal, expired_access, expired_refresh)
            .await
    }

    async fn issue_pair_inner(
        &self,
        principal: &Principal,
        expired_access: bool,
        expired_refresh: bool,
    ) -> AuthResult<TokenPair> {
        let now = self.clock.now();
        let issued_at = now.unix_timestamp();

        let expires_at = if expired_access {
            issued_at
        } else {
            (now + self.policy.access_ttl).unix_timestamp()
        };

        let claims = AccessTokenClaims {
            sub: principal.id.clone(),
            exp: expires_at,
            iat: issued_at,
            custom: principal.custom_claims.clone(),
        };
        let access_token = self.codec.encode(&claims)?;

        let refresh_value = RefreshToken::generate_value();
        let refresh_expires_at = if expired_refresh {
            now
        } else {
            now + self.policy.refresh_ttl
        };
        let row = RefreshToken {
            id: Uuid::new_v4(),
            token_hash: RefreshToken::hash_value(&refresh_value),
            principal_id: principal.id.clone(),
            created_at: now,
            expires_at: refresh_expires_at,
        };
        self.refresh_store.create(&row).await?;

        tracing::debug!(
            principal_id = %principal.id,
            expires_at,
            "Issued token pair"
        );

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_value,
            expires_at,
        })
    }

    /// Validates an access token and resolves its principal.
    ///
    /// Checks, in order: signature and expiry, principal existence, the
    /// issued-at watermark, and blacklist membership. Used by every
    /// protected request.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidSignature`] / [`AuthError::Expired`] /
    ///   [`AuthError::MissingIssuedAt`] from decoding
    /// - [`AuthError::Unauthorized`] when the principal is unknown or the
    ///   token predates the watermark
    /// - [`AuthError::Revoked`] when the token is blacklisted
    pub async fn validate_access(&self, token: &str) -> AuthResult<Principal> {
        let now = self.clock.now();
        self.check_access(token, true, now).await
    }

    /// Authenticates the caller of a refresh request from its access token.
    ///
    /// Identical to [`validate_access`] except that expiry verification is
    /// relaxed when the policy allows a just-expired access token as
    /// identity proof. Signature, watermark, and blacklist checks always
    /// apply.
    ///
    /// [`validate_access`]: TokenService::validate_access
    pub async fn authenticate_for_refresh(&self, token: &str) -> AuthResult<Principal> {
        let now = self.clock.now();
        let verify_expiry = !self.policy.allow_expired_access_on_refresh;
        self.check_access(token, verify_expiry, now).await
    }

    async fn check_access(
        &self,
        token: &str,
        verify_expiry: bool,
        now: OffsetDateTime,
    ) -> AuthResult<Principal> {
        let claims = self.codec.decode(token, verify_expiry, now)?;

        let principal = self
            .principal_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(principal_id = %claims.sub, "Unknown principal in token");
                AuthError::unauthorized("unknown principal")
            })?;

        if principal.rejects_issued_at(claims.iat) {
            tracing::debug!(
                principal_id = %principal.id,
                issued_at = claims.iat,
                "Token predates invalidation watermark"
            );
            return Err(AuthError::unauthorized(
                "credentials changed after token was issued",
            ));
        }

        if self
            .blacklist_store
            .contains(&BlacklistEntry::digest(token), now)
            .await?
        {
            tracing::debug!(principal_id = %principal.id, "Token is revoked");
            return Err(AuthError::Revoked);
        }

        Ok(principal)
    }

    /// Consumes a refresh token and issues the replacement pair.
    ///
    /// The matching row is destroyed atomically before anything else
    /// happens: under concurrent refresh attempts with the same value,
    /// exactly one caller wins and every other caller fails with
    /// [`AuthError::InvalidRefreshToken`]. When the policy requires it, the
    /// access token the caller presented is blacklisted afterwards,
    /// best-effort.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidRefreshToken`] when no live row matches
    ///   (missing, expired, or already consumed)
    /// - Any error from issuing the replacement pair
    pub async fn refresh(
        &self,
        principal: &Principal,
        refresh_value: &str,
        outgoing_access: Option<&str>,
    ) -> AuthResult<TokenPair> {
        let now = self.clock.now();
        let token_hash = RefreshToken::hash_value(refresh_value);

        let row = self
            .refresh_store
            .consume(&principal.id, &token_hash, now)
            .await?
            .ok_or_else(|| {
                tracing::debug!(
                    principal_id = %principal.id,
                    "Refresh token missing, expired, or already consumed"
                );
                AuthError::invalid_refresh_token("refresh token not found or no longer valid")
            })?;

        tracing::debug!(
            principal_id = %principal.id,
            refresh_id = %row.id,
            "Refresh token consumed"
        );

        // The old row is gone at this point. A blacklist failure below
        // leaves the outgoing access token usable until its own expiry;
        // the refresh itself still completes.
        if self.policy.blacklist_after_refresh
            && let Some(access) = outgoing_access
        {
            self.blacklist_best_effort(access, now).await;
        }

        self.issue_pair(principal).await
    }

    async fn blacklist_best_effort(&self, token: &str, now: OffsetDateTime) {
        match self.codec.decode(token, false, now) {
            Ok(claims) => {
                let expires_at =
                    OffsetDateTime::from_unix_timestamp(claims.exp).unwrap_or(now);
                if let Err(e) = self
                    .blacklist_store
                    .insert(&BlacklistEntry::digest(token), expires_at)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to blacklist access token after refresh");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping blacklist of undecodable access token");
            }
        }
    }

    /// Revokes a single access token before its natural expiry.
    ///
    /// The token's signature must verify (expiry may have passed); its
    /// digest is recorded until the token's own `exp` makes the entry moot.
    ///
    /// # Errors
    ///
    /// Returns a decode error for unverifiable tokens, or a store error if
    /// the entry cannot be persisted.
    pub async fn revoke_access(&self, token: &str) -> AuthResult<()> {
        let now = self.clock.now();
        let claims = self.codec.decode(token, false, now)?;

        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|_| AuthError::InvalidSignature)?;
        self.blacklist_store
            .insert(&BlacklistEntry::digest(token), expires_at)
            .await?;

        tracing::info!(principal_id = %claims.sub, "Access token revoked");
        Ok(())
    }

    /// Invalidates every access token issued to the principal before now.
    ///
    /// Moves the principal's issued-at watermark to the current instant, so
    /// older tokens fail validation regardless of their own expiry. Used
    /// when credentials change. A no-op when the policy disables
    /// invalidation on credential change.
    pub async fn invalidate_all_tokens(&self, principal_id: &str) -> AuthResult<()> {
        if !self.policy.invalidate_on_credential_change {
            tracing::debug!(principal_id, "Token invalidation disabled; watermark unchanged");
            return Ok(());
        }

        let now = self.clock.now();
        self.principal_store
            .set_token_watermark(principal_id, now)
            .await?;

        tracing::info!(principal_id, "Invalidated previously issued access tokens");
        Ok(())
    }

    /// Removes every outstanding refresh token for the principal.
    ///
    /// Ends all of the principal's refreshable sessions at once; already
    /// issued access tokens keep working until expiry (or use
    /// [`invalidate_all_tokens`] alongside).
    ///
    /// [`invalidate_all_tokens`]: TokenService::invalidate_all_tokens
    pub async fn revoke_refresh_tokens(&self, principal_id: &str) -> AuthResult<u64> {
        let removed = self.refresh_store.revoke_by_principal(principal_id).await?;
        tracing::info!(principal_id, removed, "Revoked outstanding refresh tokens");
        Ok(removed)
    }
}
