//! ChangeEvent - the typed record-change notification shared by every consumer.
//!
//! The three change kinds are mutually exclusive, so they are a closed enum
//! rather than a reason code plus optional payload. `Deleted` carries only an
//! identity because the remote store cannot return a body for a removed record.

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};

/// Raw reason attached to a delta-feed notification, before bodies are fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeReason {
    Created,
    Updated,
    Deleted,
}

/// A resolved record change: full body for creations and updates, identity
/// only for deletions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChangeEvent {
    Created(Record),
    Updated(Record),
    Deleted(RecordId),
}

impl ChangeEvent {
    /// The identity the event is about, regardless of variant.
    pub fn record_id(&self) -> &RecordId {
        match self {
            ChangeEvent::Created(record) | ChangeEvent::Updated(record) => record.id(),
            ChangeEvent::Deleted(id) => id,
        }
    }

    pub fn reason(&self) -> ChangeReason {
        match self {
            ChangeEvent::Created(_) => ChangeReason::Created,
            ChangeEvent::Updated(_) => ChangeReason::Updated,
            ChangeEvent::Deleted(_) => ChangeReason::Deleted,
        }
    }
}

/// One delta cycle's worth of events, delivered to consumers as a unit.
pub type ChangeBatch = Vec<ChangeEvent>;
