//! RemoteStore - the interface to the authoritative record store.
//!
//! The remote store is treated as an opaque key-value collaborator: it can be
//! queried, asked for a drained batch of delta notifications keyed by a change
//! token, asked for record bodies in bulk, and written through. Writes are
//! last-write-wins on the remote side; this crate never arbitrates conflicts.
//!
//! ## Example
//!
//! ```ignore
//! use synced_rust::{InMemoryRemoteStore, RemoteStore, Record, RecordId};
//!
//! let store = InMemoryRemoteStore::new();
//! let saved = store.save(
//!     Record::new(RecordId::generate(), "HazardReport").with_field("isResolved", false),
//! )?;
//!
//! // Later: drain everything that changed since the last cursor.
//! let feed = store.fetch_change_notifications(None)?;
//! assert_eq!(feed.notifications.len(), 1);
//! ```

mod in_memory;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::change::ChangeReason;
use crate::record::{Record, RecordId};
use crate::token::ChangeToken;

pub use in_memory::InMemoryRemoteStore;

/// Error type for remote store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStoreError {
    /// The store is unreachable. Retryable at the next wake-up.
    Transport(String),
    /// The store no longer recognizes the presented change token. The caller
    /// must discard the cursor and fall back to a full query.
    TokenExpired,
}

impl fmt::Display for RemoteStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteStoreError::Transport(msg) => write!(f, "remote store unreachable: {}", msg),
            RemoteStoreError::TokenExpired => write!(f, "change token expired"),
        }
    }
}

impl std::error::Error for RemoteStoreError {}

/// One raw delta-feed entry: which record changed and why. Bodies come later,
/// from a separate `fetch_records` round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub record_id: RecordId,
    pub reason: ChangeReason,
}

/// A fully drained notification feed plus the terminal cursor.
///
/// The feed may repeat or coalesce entries for the same identity; consumers
/// collapse them before acting. The token is valid even when the feed is empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    pub notifications: Vec<ChangeNotification>,
    pub token: ChangeToken,
}

/// Interface to the authoritative record store.
///
/// Implementations are expected to assign `created_at`/`modified_at` on save
/// and echo back the authoritative saved form. `fetch_records` tolerates
/// missing IDs by omitting them from the result.
pub trait RemoteStore: Send + Sync {
    /// Full query, used only for initial view population and full resyncs.
    fn query(
        &self,
        record_type: &str,
        predicate: &dyn Fn(&Record) -> bool,
        sort: &dyn Fn(&Record, &Record) -> Ordering,
    ) -> Result<Vec<Record>, RemoteStoreError>;

    /// Drain delta notifications recorded after `since`. `None` drains from
    /// the oldest history the store still retains.
    fn fetch_change_notifications(
        &self,
        since: Option<&ChangeToken>,
    ) -> Result<NotificationFeed, RemoteStoreError>;

    /// Batched body fetch. IDs with no current body are silently absent.
    fn fetch_records(
        &self,
        ids: &[RecordId],
    ) -> Result<HashMap<RecordId, Record>, RemoteStoreError>;

    /// Save a record; the echo carries server-assigned timestamps.
    fn save(&self, record: Record) -> Result<Record, RemoteStoreError>;

    /// Delete by identity; the echo confirms the delete took effect.
    fn delete(&self, id: &RecordId) -> Result<RecordId, RemoteStoreError>;
}
