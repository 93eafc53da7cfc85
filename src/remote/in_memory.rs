//! InMemoryRemoteStore - HashMap-backed remote store for testing and development.
//!
//! Behaves like the real collaborator where it matters to the sync pipeline:
//! saves classify created-vs-updated by prior existence, modification
//! timestamps are strictly monotonic, every write appends to a notification
//! log, and tokens are opaque positions into that log. Fault hooks
//! (`set_offline`, `expire_history`) make transport failures and token expiry
//! exercisable without a network.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::change::ChangeReason;
use crate::record::{Record, RecordId};
use crate::token::ChangeToken;

use super::{ChangeNotification, NotificationFeed, RemoteStore, RemoteStoreError};

struct Inner {
    /// Current record bodies, serialized the way a real backend would hold them.
    records: HashMap<RecordId, Vec<u8>>,
    /// Append-only notification log; tokens index into it.
    log: Vec<ChangeNotification>,
    /// Log positions before this are expired; tokens pointing there are stale.
    history_start: usize,
    /// Last assigned modification stamp, kept strictly increasing.
    clock: u64,
    offline: bool,
}

/// In-memory remote store backed by a HashMap and a notification log.
/// Clone-friendly via Arc, so every component can hold its own handle.
#[derive(Clone)]
pub struct InMemoryRemoteStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn encode_record(record: &Record) -> Result<Vec<u8>, RemoteStoreError> {
    serde_json::to_vec(record).map_err(|e| RemoteStoreError::Transport(e.to_string()))
}

fn decode_record(bytes: &[u8]) -> Result<Record, RemoteStoreError> {
    serde_json::from_slice(bytes).map_err(|e| RemoteStoreError::Transport(e.to_string()))
}

fn encode_position(position: u64) -> Result<ChangeToken, RemoteStoreError> {
    bitcode::serialize(&position)
        .map(ChangeToken::new)
        .map_err(|e| RemoteStoreError::Transport(e.to_string()))
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                records: HashMap::new(),
                log: Vec::new(),
                history_start: 0,
                clock: 0,
                offline: false,
            })),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, RemoteStoreError> {
        self.inner
            .read()
            .map_err(|_| RemoteStoreError::Transport("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, RemoteStoreError> {
        self.inner
            .write()
            .map_err(|_| RemoteStoreError::Transport("lock poisoned".into()))
    }

    /// Simulate the store becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut inner) = self.inner.write() {
            inner.offline = offline;
        }
    }

    /// Invalidate every token handed out so far, as a real backend does when
    /// it prunes notification history.
    pub fn expire_history(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.history_start = inner.log.len();
        }
    }

    /// Drop a record body without emitting a notification. Simulates a record
    /// vanishing between the notification drain and the body fetch.
    pub fn remove_unlogged(&self, id: &RecordId) {
        if let Ok(mut inner) = self.inner.write() {
            inner.records.remove(id);
        }
    }

    /// Number of record bodies currently held.
    pub fn record_count(&self) -> usize {
        self.inner.read().map(|i| i.records.len()).unwrap_or(0)
    }

    /// Whether a body exists for the given identity.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.inner
            .read()
            .map(|i| i.records.contains_key(id))
            .unwrap_or(false)
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn query(
        &self,
        record_type: &str,
        predicate: &dyn Fn(&Record) -> bool,
        sort: &dyn Fn(&Record, &Record) -> Ordering,
    ) -> Result<Vec<Record>, RemoteStoreError> {
        let inner = self.read()?;
        if inner.offline {
            return Err(RemoteStoreError::Transport("store offline".into()));
        }

        let mut results = Vec::new();
        for bytes in inner.records.values() {
            let record = decode_record(bytes)?;
            if record.record_type() == record_type && predicate(&record) {
                results.push(record);
            }
        }
        results.sort_by(|a, b| sort(a, b));
        Ok(results)
    }

    fn fetch_change_notifications(
        &self,
        since: Option<&ChangeToken>,
    ) -> Result<NotificationFeed, RemoteStoreError> {
        let inner = self.read()?;
        if inner.offline {
            return Err(RemoteStoreError::Transport("store offline".into()));
        }

        let start = match since {
            None => inner.history_start,
            Some(token) => {
                let position: u64 = bitcode::deserialize(token.as_bytes())
                    .map_err(|_| RemoteStoreError::TokenExpired)?;
                let position = position as usize;
                if position < inner.history_start || position > inner.log.len() {
                    return Err(RemoteStoreError::TokenExpired);
                }
                position
            }
        };

        let notifications = inner.log[start..].to_vec();
        debug!(
            drained = notifications.len(),
            "drained change notifications"
        );
        Ok(NotificationFeed {
            notifications,
            token: encode_position(inner.log.len() as u64)?,
        })
    }

    fn fetch_records(
        &self,
        ids: &[RecordId],
    ) -> Result<HashMap<RecordId, Record>, RemoteStoreError> {
        let inner = self.read()?;
        if inner.offline {
            return Err(RemoteStoreError::Transport("store offline".into()));
        }

        let mut found = HashMap::new();
        for id in ids {
            if let Some(bytes) = inner.records.get(id) {
                found.insert(id.clone(), decode_record(bytes)?);
            }
        }
        Ok(found)
    }

    fn save(&self, record: Record) -> Result<Record, RemoteStoreError> {
        let mut inner = self.write()?;
        if inner.offline {
            return Err(RemoteStoreError::Transport("store offline".into()));
        }

        let existing = match inner.records.get(record.id()) {
            Some(bytes) => Some(decode_record(bytes)?),
            None => None,
        };

        inner.clock = now_millis().max(inner.clock + 1);
        let stamp = inner.clock;
        let created_at = existing
            .as_ref()
            .map(|r| r.created_at())
            .unwrap_or(stamp);

        let echo = record.with_timestamps(created_at, stamp);
        let bytes = encode_record(&echo)?;
        inner.records.insert(echo.id().clone(), bytes);
        inner.log.push(ChangeNotification {
            record_id: echo.id().clone(),
            reason: if existing.is_some() {
                ChangeReason::Updated
            } else {
                ChangeReason::Created
            },
        });

        Ok(echo)
    }

    fn delete(&self, id: &RecordId) -> Result<RecordId, RemoteStoreError> {
        let mut inner = self.write()?;
        if inner.offline {
            return Err(RemoteStoreError::Transport("store offline".into()));
        }

        if inner.records.remove(id).is_some() {
            inner.log.push(ChangeNotification {
                record_id: id.clone(),
                reason: ChangeReason::Deleted,
            });
        }
        Ok(id.clone())
    }
}
