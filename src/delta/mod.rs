//! DeltaFetcher - turns a drained notification feed into resolved change events.
//!
//! The feed only carries identities and reasons; bodies for creations and
//! updates come from a second, batched round-trip. The fetcher collapses
//! repeated notifications per identity (last reason wins), splits deletions
//! out so they never wait on a body, and rejoins fetched bodies with their
//! reasons into a single batch of `ChangeEvent`s plus the terminal cursor.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::change::{ChangeBatch, ChangeEvent, ChangeReason};
use crate::record::RecordId;
use crate::remote::{RemoteStore, RemoteStoreError};
use crate::token::ChangeToken;

/// Error type for a delta fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote store was unreachable. The caller retries at its next
    /// wake-up; the fetcher itself never loops.
    Transport(String),
    /// The cursor is stale. The caller must clear it and fall back to a full
    /// query resync.
    TokenExpired,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "delta fetch failed: {}", msg),
            FetchError::TokenExpired => write!(f, "change token expired; full resync required"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<RemoteStoreError> for FetchError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::Transport(msg) => FetchError::Transport(msg),
            RemoteStoreError::TokenExpired => FetchError::TokenExpired,
        }
    }
}

/// Result of one fetch cycle.
///
/// `token` is `None` when the drain produced no notifications; the caller must
/// leave its persisted cursor untouched in that case, so a transport error can
/// never be mistaken for "nothing changed".
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaBatch {
    pub events: ChangeBatch,
    pub token: Option<ChangeToken>,
}

/// Reason a body was fetched for. Deletions are partitioned out before the
/// body fetch, so the rejoin step only ever sees these two.
enum BodyReason {
    Created,
    Updated,
}

/// Resolves one delta cycle against a remote store.
pub struct DeltaFetcher<'a, S: RemoteStore> {
    store: &'a S,
}

impl<'a, S: RemoteStore> DeltaFetcher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Drain the feed from `last_token` and resolve it into change events.
    ///
    /// At most one event per identity is emitted: when the feed repeats an
    /// identity within one drain, the last reason seen wins. Bodies that have
    /// vanished between drain and fetch are omitted; the store will report
    /// them as deleted on a later cycle.
    pub fn fetch(&self, last_token: Option<&ChangeToken>) -> Result<DeltaBatch, FetchError> {
        let feed = self.store.fetch_change_notifications(last_token)?;

        let mut reasons: HashMap<RecordId, ChangeReason> = HashMap::new();
        for notification in feed.notifications {
            reasons.insert(notification.record_id, notification.reason);
        }

        if reasons.is_empty() {
            debug!("delta drain produced no notifications");
            return Ok(DeltaBatch {
                events: Vec::new(),
                token: None,
            });
        }

        let mut deletions = Vec::new();
        let mut live: HashMap<RecordId, BodyReason> = HashMap::new();
        for (record_id, reason) in reasons {
            match reason {
                ChangeReason::Deleted => deletions.push(record_id),
                ChangeReason::Created => {
                    live.insert(record_id, BodyReason::Created);
                }
                ChangeReason::Updated => {
                    live.insert(record_id, BodyReason::Updated);
                }
            }
        }

        let live_ids: Vec<RecordId> = live.keys().cloned().collect();
        let mut bodies = if live_ids.is_empty() {
            HashMap::new()
        } else {
            self.store.fetch_records(&live_ids)?
        };

        let mut events: ChangeBatch = deletions.into_iter().map(ChangeEvent::Deleted).collect();
        let mut vanished = 0usize;
        for (record_id, reason) in live {
            match bodies.remove(&record_id) {
                Some(record) => events.push(match reason {
                    BodyReason::Created => ChangeEvent::Created(record),
                    BodyReason::Updated => ChangeEvent::Updated(record),
                }),
                None => vanished += 1,
            }
        }
        if vanished > 0 {
            warn!(
                vanished,
                "record bodies missing from batched fetch; omitting until next cycle"
            );
        }

        debug!(events = events.len(), "delta cycle resolved");
        Ok(DeltaBatch {
            events,
            token: Some(feed.token),
        })
    }
}
