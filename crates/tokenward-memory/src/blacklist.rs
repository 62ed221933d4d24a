//! In-memory blacklist store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use tokenward::AuthResult;
use tokenward::storage::BlacklistStore;

/// Blacklist store backed by a process-local map of digest → expiry.
#[derive(Default)]
pub struct InMemoryBlacklistStore {
    entries: RwLock<HashMap<String, OffsetDateTime>>,
}

impl InMemoryBlacklistStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, stale entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, OffsetDateTime>> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, OffsetDateTime>> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl BlacklistStore for InMemoryBlacklistStore {
    async fn insert(&self, token_digest: &str, expires_at: OffsetDateTime) -> AuthResult<()> {
        // Idempotent: re-inserting a digest just refreshes its expiry.
        self.write_entries()
            .insert(token_digest.to_string(), expires_at);
        Ok(())
    }

    async fn contains(&self, token_digest: &str, now: OffsetDateTime) -> AuthResult<bool> {
        Ok(self
            .read_entries()
            .get(token_digest)
            .map(|expires_at| now <= *expires_at)
            .unwrap_or(false))
    }

    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64> {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|_, expires_at| now <= *expires_at);
        Ok((before - entries.len()) as u64)
    }
}
