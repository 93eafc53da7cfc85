//! ChangeToken - opaque cursor marking how far the delta feed has been consumed.
//!
//! Tokens are minted by the remote store and are meaningless to everyone else;
//! locally they are only held, persisted, and handed back. The persistence
//! seam is the `ChangeTokenStore` trait so hosts can keep the cursor wherever
//! they keep small durable state.
//!
//! Ordering invariant: a token obtained after processing a batch must only be
//! persisted once every event in that batch has been handed to consumers.
//! `SyncCoordinator` sequences this; the store just reads and writes.

mod in_memory;

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

pub use in_memory::InMemoryTokenStore;

/// Error type for token store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreError {
    /// Storage-level error.
    Storage(String),
    /// A persisted token could not be decoded.
    Encoding(String),
}

impl fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStoreError::Storage(msg) => write!(f, "token storage error: {}", msg),
            TokenStoreError::Encoding(msg) => write!(f, "token encoding error: {}", msg),
        }
    }
}

impl std::error::Error for TokenStoreError {}

/// Opaque delta-feed cursor, totally ordered by the remote store that minted it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeToken(Vec<u8>);

impl ChangeToken {
    pub fn new(bytes: Vec<u8>) -> Self {
        ChangeToken(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text-safe form for hosts that persist the cursor in string settings.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, TokenStoreError> {
        STANDARD
            .decode(encoded)
            .map(ChangeToken)
            .map_err(|e| TokenStoreError::Encoding(e.to_string()))
    }
}

/// Persistence seam for the delta-feed cursor.
///
/// Exactly one sync pipeline reads and advances a given cursor; the store is
/// not expected to arbitrate concurrent writers.
pub trait ChangeTokenStore: Send + Sync {
    /// Load the persisted cursor. `None` means no delta cycle has completed yet.
    fn load(&self) -> Result<Option<ChangeToken>, TokenStoreError>;

    /// Persist a new cursor, replacing any previous one.
    fn store(&self, token: &ChangeToken) -> Result<(), TokenStoreError>;

    /// Discard the cursor entirely (full-resync fallback).
    fn clear(&self) -> Result<(), TokenStoreError>;
}
