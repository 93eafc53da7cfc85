//! ChangeChannel - in-process fan-out of change-event batches.
//!
//! One channel carries every change regardless of origin: remote delta cycles
//! and locally initiated mutations publish into the same log, so a consumer
//! never has to care where a change came from. Batches are delivered whole and
//! in publish order; each subscriber tracks its own read position, so any
//! number of independent views can consume the same stream.
//!
//! ## Example
//!
//! ```ignore
//! use synced_rust::{ChangeChannel, ChangeEvent};
//!
//! let channel = ChangeChannel::new();
//! let mut subscriber = channel.subscribe();
//!
//! channel.publish(vec![ChangeEvent::Deleted("r-1".into())]);
//!
//! for batch in subscriber.drain() {
//!     view.apply(&batch);
//! }
//! ```

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::change::ChangeBatch;

/// Publisher half of the change stream.
///
/// Clone-friendly via Arc: every producer (sync coordinator, mutation
/// broadcaster) holds its own handle to the same log.
#[derive(Clone)]
pub struct ChangeChannel {
    log: Arc<RwLock<Vec<ChangeBatch>>>,
}

impl Default for ChangeChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeChannel {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a batch to the log. Empty batches are dropped; there is nothing
    /// for a consumer to apply.
    pub fn publish(&self, batch: ChangeBatch) {
        if batch.is_empty() {
            return;
        }
        debug!(events = batch.len(), "published change batch");
        self.log.write().unwrap().push(batch);
    }

    /// Create a subscriber positioned at the current end of the log: it sees
    /// only batches published after this call. Consumers populate their views
    /// from a full query first, then subscribe.
    pub fn subscribe(&self) -> ChangeSubscriber {
        let position = self.log.read().unwrap().len();
        ChangeSubscriber {
            log: Arc::clone(&self.log),
            position,
        }
    }

    /// Total number of batches published so far.
    pub fn len(&self) -> usize {
        self.log.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().unwrap().is_empty()
    }
}

/// Consumer half of the change stream: an independent cursor into the shared
/// log. Owned by a single consumer; draining requires `&mut self`, which is
/// the structural guarantee that one view never applies concurrently.
pub struct ChangeSubscriber {
    log: Arc<RwLock<Vec<ChangeBatch>>>,
    position: usize,
}

impl ChangeSubscriber {
    /// Take every batch published since the last drain, in publish order.
    pub fn drain(&mut self) -> Vec<ChangeBatch> {
        let log = self.log.read().unwrap();
        let pending = log[self.position..].to_vec();
        self.position = log.len();
        pending
    }

    /// Take the next pending batch, if any.
    pub fn next_batch(&mut self) -> Option<ChangeBatch> {
        let log = self.log.read().unwrap();
        if self.position < log.len() {
            let batch = log[self.position].clone();
            self.position += 1;
            Some(batch)
        } else {
            None
        }
    }

    /// Number of batches waiting to be drained.
    pub fn pending(&self) -> usize {
        self.log.read().unwrap().len() - self.position
    }
}
