//! In-memory principal store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use tokenward::storage::PrincipalStore;
use tokenward::types::Principal;
use tokenward::{AuthError, AuthResult};

/// Principal store backed by a process-local map keyed by identifier.
#[derive(Default)]
pub struct InMemoryPrincipalStore {
    principals: RwLock<HashMap<String, Principal>>,
}

impl InMemoryPrincipalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a principal record.
    pub fn upsert(&self, principal: Principal) {
        self.write_principals()
            .insert(principal.id.clone(), principal);
    }

    fn read_principals(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Principal>> {
        self.principals
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_principals(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Principal>> {
        self.principals
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_id(&self, principal_id: &str) -> AuthResult<Option<Principal>> {
        Ok(self.read_principals().get(principal_id).cloned())
    }

    async fn set_token_watermark(&self, principal_id: &str, at: OffsetDateTime) -> AuthResult<()> {
        let mut principals = self.write_principals();
        let principal = principals
            .get_mut(principal_id)
            .ok_or_else(|| AuthError::unauthorized("unknown principal"))?;
        principal.token_watermark = Some(at);
        Ok(())
    }
}
