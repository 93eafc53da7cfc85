//! MutationBroadcaster - announces local writes on the shared change stream.
//!
//! A locally initiated save or delete goes to the remote store first; only the
//! server's echo is published, and only after the write succeeds. Consumers
//! therefore see one unified event stream regardless of where a change
//! originated, and the actor that caused a mutation converges without waiting
//! for its own change to come back through the delta feed.

use tracing::debug;

use crate::change::ChangeEvent;
use crate::channel::ChangeChannel;
use crate::record::{Record, RecordId};
use crate::remote::{RemoteStore, RemoteStoreError};

/// Wraps a remote store handle and the change channel local writes publish to.
pub struct MutationBroadcaster<S: RemoteStore> {
    store: S,
    channel: ChangeChannel,
}

impl<S: RemoteStore> MutationBroadcaster<S> {
    pub fn new(store: S, channel: ChangeChannel) -> Self {
        Self { store, channel }
    }

    /// Save a brand-new record and announce it as created.
    pub fn create(&self, record: Record) -> Result<Record, RemoteStoreError> {
        let saved = self.store.save(record)?;
        debug!(id = %saved.id(), "broadcasting local creation");
        self.channel
            .publish(vec![ChangeEvent::Created(saved.clone())]);
        Ok(saved)
    }

    /// Save an edit to an existing record and announce it as updated.
    pub fn update(&self, record: Record) -> Result<Record, RemoteStoreError> {
        let saved = self.store.save(record)?;
        debug!(id = %saved.id(), "broadcasting local update");
        self.channel
            .publish(vec![ChangeEvent::Updated(saved.clone())]);
        Ok(saved)
    }

    /// Delete by identity and announce the confirmed deletion.
    pub fn delete(&self, id: &RecordId) -> Result<RecordId, RemoteStoreError> {
        let deleted = self.store.delete(id)?;
        debug!(id = %deleted, "broadcasting local deletion");
        self.channel
            .publish(vec![ChangeEvent::Deleted(deleted.clone())]);
        Ok(deleted)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn channel(&self) -> &ChangeChannel {
        &self.channel
    }
}
