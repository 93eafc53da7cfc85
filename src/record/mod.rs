//! Record - the remote-store entity held locally as a copy, never the authority.
//!
//! A `Record` pairs a stable identity and record type with server-assigned
//! creation/modification timestamps and an opaque bag of typed field values.
//! Timestamps are epoch milliseconds and are `0` until the remote store has
//! echoed the record back from a save.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a record, assigned by whichever side creates it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    /// Mint a fresh random identity for a record created locally.
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

/// A single value in a record's field bag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(b: Vec<u8>) -> Self {
        FieldValue::Bytes(b)
    }
}

/// A record as held by the remote store.
///
/// Immutable in spirit: local code builds records with `with_field`/`set_field`
/// and hands them to the store; the store's echo is the authoritative form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    record_type: String,
    created_at: u64,
    modified_at: u64,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: RecordId, record_type: impl Into<String>) -> Self {
        Record {
            id,
            record_type: record_type.into(),
            created_at: 0,
            modified_at: 0,
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Epoch milliseconds of first save; `0` until the store has stamped it.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Epoch milliseconds of the latest save; `0` until the store has stamped it.
    pub fn modified_at(&self) -> u64 {
        self.modified_at
    }

    /// Store-side: stamp the server-assigned timestamps onto an echo.
    pub fn with_timestamps(mut self, created_at: u64, modified_at: u64) -> Self {
        self.created_at = created_at;
        self.modified_at = modified_at;
        self
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(FieldValue::as_bool)
    }

    pub fn int_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(FieldValue::as_int)
    }

    pub fn float_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(FieldValue::as_float)
    }

    pub fn bytes_field(&self, name: &str) -> Option<&[u8]> {
        self.field(name).and_then(FieldValue::as_bytes)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}
