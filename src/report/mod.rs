//! HazardReport - typed view over the raw record field bag.
//!
//! One immutable `Record` is the single representation; this type exists only
//! at the edges, as pure conversions to and from it. Field names are shared
//! constants so the two directions can never drift.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};

/// Record type tag for hazard reports in the remote store.
pub const HAZARD_REPORT_TYPE: &str = "HazardReport";

mod fields {
    pub const DESCRIPTION: &str = "hazardDescription";
    pub const IS_EMERGENCY: &str = "isEmergency";
    pub const IS_RESOLVED: &str = "isResolved";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const PHOTO: &str = "hazardPhoto";
}

/// Error type for record-to-report conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The record carries a different record type tag.
    WrongRecordType(String),
    /// A required field is absent or has the wrong kind.
    MissingField(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::WrongRecordType(found) => {
                write!(f, "expected a {} record, found {}", HAZARD_REPORT_TYPE, found)
            }
            ReportError::MissingField(name) => {
                write!(f, "hazard report record is missing field {}", name)
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// A hazard report as the rest of the application sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub id: Option<RecordId>,
    pub description: String,
    pub is_emergency: bool,
    pub is_resolved: bool,
    /// Latitude/longitude of the hazard, when capture succeeded.
    pub location: Option<(f64, f64)>,
    pub photo: Option<Vec<u8>>,
    pub created_at: u64,
    pub modified_at: u64,
}

impl HazardReport {
    /// A fresh, unresolved, non-emergency report with no identity yet.
    pub fn new(description: impl Into<String>) -> Self {
        HazardReport {
            id: None,
            description: description.into(),
            is_emergency: false,
            is_resolved: false,
            location: None,
            photo: None,
            created_at: 0,
            modified_at: 0,
        }
    }

    /// Read a report out of a record.
    pub fn from_record(record: &Record) -> Result<Self, ReportError> {
        if record.record_type() != HAZARD_REPORT_TYPE {
            return Err(ReportError::WrongRecordType(
                record.record_type().to_string(),
            ));
        }

        let description = record
            .text_field(fields::DESCRIPTION)
            .ok_or(ReportError::MissingField(fields::DESCRIPTION))?
            .to_string();

        let location = match (
            record.float_field(fields::LATITUDE),
            record.float_field(fields::LONGITUDE),
        ) {
            (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
            _ => None,
        };

        Ok(HazardReport {
            id: Some(record.id().clone()),
            description,
            is_emergency: record.bool_field(fields::IS_EMERGENCY).unwrap_or(false),
            is_resolved: record.bool_field(fields::IS_RESOLVED).unwrap_or(false),
            location,
            photo: record.bytes_field(fields::PHOTO).map(|b| b.to_vec()),
            created_at: record.created_at(),
            modified_at: record.modified_at(),
        })
    }

    /// Build the record form, minting an identity if the report has none.
    /// Timestamps are the store's to assign; the record goes out unstamped.
    pub fn to_record(&self) -> Record {
        let id = self.id.clone().unwrap_or_else(RecordId::generate);
        let mut record = Record::new(id, HAZARD_REPORT_TYPE)
            .with_field(fields::DESCRIPTION, self.description.clone())
            .with_field(fields::IS_EMERGENCY, self.is_emergency)
            .with_field(fields::IS_RESOLVED, self.is_resolved);

        if let Some((latitude, longitude)) = self.location {
            record.set_field(fields::LATITUDE, latitude);
            record.set_field(fields::LONGITUDE, longitude);
        }
        if let Some(photo) = &self.photo {
            record.set_field(fields::PHOTO, photo.clone());
        }
        record
    }

    /// Membership test for the unresolved-reports view.
    pub fn is_unresolved_record(record: &Record) -> bool {
        record.bool_field(fields::IS_RESOLVED) == Some(false)
    }

    /// Membership test for the resolved-reports view.
    pub fn is_resolved_record(record: &Record) -> bool {
        record.bool_field(fields::IS_RESOLVED) == Some(true)
    }
}
