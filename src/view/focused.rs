//! FocusedView - follows a single record through the change stream.
//!
//! A detail surface holds one record and only cares about updates to that
//! identity; creations and deletions are navigation concerns owned elsewhere.

use crate::change::ChangeEvent;
use crate::record::Record;

/// Tracks the latest body of one record by identity.
pub struct FocusedView {
    record: Record,
}

impl FocusedView {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    /// The record as last seen.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Take updates for the followed identity; everything else is ignored.
    pub fn apply(&mut self, events: &[ChangeEvent]) {
        for event in events {
            if let ChangeEvent::Updated(record) = event {
                if record.id() == self.record.id() {
                    self.record = record.clone();
                }
            }
        }
    }
}
