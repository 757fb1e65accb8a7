//! In-memory identity store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use opencampus_auth::{Identity, IdentityStore, StoreError};
use opencampus_core::IdentityId;

/// `RwLock<HashMap>`-backed identity store.
///
/// Email uniqueness is enforced under the write lock, so two concurrent
/// inserts with the same email cannot both succeed (the same guarantee a
/// SQL unique index gives the real adapter).
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    records: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(records.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(records.get(&id).cloned())
    }

    async fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        // Uniqueness check and insert happen under one lock: atomic.
        if records.values().any(|i| i.email == identity.email) {
            return Err(StoreError::DuplicateEmail);
        }
        records.insert(identity.id, identity);
        Ok(())
    }

    async fn update(&self, identity: Identity) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        if !records.contains_key(&identity.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(identity.id, identity);
        Ok(())
    }
}
