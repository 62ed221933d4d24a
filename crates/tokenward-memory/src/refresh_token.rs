//! In-memory refresh token store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use tokenward::storage::RefreshTokenStore;
use tokenward::types::RefreshToken;
use tokenward::{AuthError, AuthResult};

/// Refresh token store backed by a process-local map keyed by token hash.
///
/// Consumption takes the write lock for the whole check-and-remove, so
/// exactly one concurrent caller can win a given token.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    rows: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, expired rows included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_rows().len()
    }

    /// Returns `true` if the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_rows(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, RefreshToken>> {
        self.rows.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_rows(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, RefreshToken>> {
        self.rows.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut rows = self.write_rows();
        if rows.contains_key(&token.token_hash) {
            return Err(AuthError::store_unavailable("duplicate token hash"));
        }
        rows.insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn consume(
        &self,
        principal_id: &str,
        token_hash: &str,
        now: OffsetDateTime,
    ) -> AuthResult<Option<RefreshToken>> {
        let mut rows = self.write_rows();

        let Some(row) = rows.get(token_hash) else {
            return Ok(None);
        };

        if row.principal_id != principal_id {
            return Ok(None);
        }

        if row.is_expired_at(now) {
            // Lazy expiry: the row is dead either way, drop it.
            rows.remove(token_hash);
            return Ok(None);
        }

        Ok(rows.remove(token_hash))
    }

    async fn revoke_by_principal(&self, principal_id: &str) -> AuthResult<u64> {
        let mut rows = self.write_rows();
        let before = rows.len();
        rows.retain(|_, row| row.principal_id != principal_id);
        Ok((before - rows.len()) as u64)
    }

    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64> {
        let mut rows = self.write_rows();
        let before = rows.len();
        rows.retain(|_, row| !row.is_expired_at(now));
        Ok((before - rows.len()) as u64)
    }
}
