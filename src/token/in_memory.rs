//! InMemoryTokenStore - single-slot token store for testing and development.

use std::sync::{Arc, RwLock};

use super::{ChangeToken, ChangeTokenStore, TokenStoreError};

/// In-memory cursor slot. Clone-friendly via Arc, so a test can hold a handle
/// to the same slot the sync pipeline writes through.
#[derive(Clone)]
pub struct InMemoryTokenStore {
    slot: Arc<RwLock<Option<ChangeToken>>>,
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a store pre-seeded with a cursor, as after a process restart.
    pub fn with_token(token: ChangeToken) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(token))),
        }
    }
}

impl ChangeTokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<ChangeToken>, TokenStoreError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| TokenStoreError::Storage("lock poisoned".into()))?;
        Ok(slot.clone())
    }

    fn store(&self, token: &ChangeToken) -> Result<(), TokenStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| TokenStoreError::Storage("lock poisoned".into()))?;
        *slot = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| TokenStoreError::Storage("lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}
