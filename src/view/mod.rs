//! LocalView - an ordered, filtered local projection of the record set.
//!
//! A view owns a membership predicate (e.g. "unresolved only") and a sort
//! comparator. It is populated once from a full query, then kept current by
//! applying change-event batches. `apply` is total: every event variant has a
//! defined effect for every view state, so reconciliation never fails and
//! re-delivering a batch never corrupts the view.
//!
//! ## Example
//!
//! ```ignore
//! use synced_rust::{created_ascending, LocalView};
//!
//! let mut active = LocalView::new(
//!     |r| r.bool_field("isResolved") == Some(false),
//!     created_ascending(),
//! );
//! let records = store.query("HazardReport", &|r| active.matches(r), &|a, b| active.compare(a, b))?;
//! active.populate(records);
//!
//! for batch in subscriber.drain() {
//!     active.apply(&batch);
//! }
//! ```

mod focused;

use std::cmp::Ordering;

use crate::change::ChangeEvent;
use crate::record::{Record, RecordId};

pub use focused::FocusedView;

/// Membership test for a view.
pub type Predicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Sort order for a view.
pub type Comparator = Box<dyn Fn(&Record, &Record) -> Ordering + Send + Sync>;

/// Oldest first, by server-assigned creation time.
pub fn created_ascending() -> Comparator {
    Box::new(|a, b| a.created_at().cmp(&b.created_at()))
}

/// Most recently modified first.
pub fn modified_descending() -> Comparator {
    Box::new(|a, b| b.modified_at().cmp(&a.modified_at()))
}

/// An ordered, filtered local projection, kept current via `apply`.
pub struct LocalView {
    records: Vec<Record>,
    predicate: Predicate,
    comparator: Comparator,
}

impl LocalView {
    pub fn new(
        predicate: impl Fn(&Record) -> bool + Send + Sync + 'static,
        comparator: Comparator,
    ) -> Self {
        Self {
            records: Vec::new(),
            predicate: Box::new(predicate),
            comparator,
        }
    }

    /// Replace the view's contents from a full query result. Filters and
    /// sorts locally, so the invariants hold even if the store ignored the
    /// query's predicate or sort.
    pub fn populate(&mut self, records: Vec<Record>) {
        self.records.clear();
        for record in records {
            if (self.predicate)(&record) {
                self.upsert(record);
            }
        }
        self.resort();
    }

    /// Merge a batch of change events into the view.
    ///
    /// Batch order carries no causal guarantee; the policy is order-insensitive
    /// per identity because upstream collapses each drain to one event per
    /// identity. Applying the same batch twice leaves the view unchanged.
    pub fn apply(&mut self, events: &[ChangeEvent]) {
        for event in events {
            match event {
                ChangeEvent::Created(record) => {
                    if (self.predicate)(record) {
                        self.upsert(record.clone());
                    }
                }
                ChangeEvent::Updated(record) => {
                    let present = self.position_of(record.id());
                    let passes = (self.predicate)(record);
                    match (present, passes) {
                        // Moved out of this view (e.g. resolved, and this view
                        // only shows unresolved reports).
                        (Some(index), false) => {
                            self.records.remove(index);
                        }
                        (Some(index), true) => self.records[index] = record.clone(),
                        // Moved into this view.
                        (None, true) => self.records.push(record.clone()),
                        (None, false) => {}
                    }
                }
                ChangeEvent::Deleted(id) => {
                    if let Some(index) = self.position_of(id) {
                        self.records.remove(index);
                    }
                }
            }
        }
        self.resort();
    }

    /// Whether a record belongs in this view.
    pub fn matches(&self, record: &Record) -> bool {
        (self.predicate)(record)
    }

    /// This view's sort order.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        (self.comparator)(a, b)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.position_of(id).map(|index| &self.records[index])
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn upsert(&mut self, record: Record) {
        match self.position_of(record.id()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    fn resort(&mut self) {
        let comparator = &self.comparator;
        self.records.sort_by(|a, b| comparator(a, b));
    }
}
