// libs/shared/models/src/records.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ride::Ride;

/// Appointment status value selected by the scheduled reconciliation pass.
/// Statuses are source-defined strings; this is the only one the engine
/// interprets.
pub const STATUS_BOOKED: &str = "Booked";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Epic,
    Veradigm,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Epic => write!(f, "epic"),
            Provider::Veradigm => write!(f, "veradigm"),
        }
    }
}

/// One row per appointment id; every reconciliation pass upserts, never
/// appends. The `ride` field is always present: either a real trip summary
/// or the no-ride sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub provider: Provider,
    #[serde(default = "Ride::no_ride")]
    pub ride: Ride,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Appointment {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_booked(&self) -> bool {
        self.status == STATUS_BOOKED
    }

    /// Stamped by the store on every write, ride-only updates included.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.modified = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    #[serde(default)]
    pub via_rider_id: String,
    pub provider: Provider,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Patient {
    /// A patient is eligible for ride matching iff the rider id is
    /// non-empty after trimming whitespace.
    pub fn rider_id(&self) -> Option<&str> {
        let trimmed = self.via_rider_id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.modified = now;
    }
}

/// Operator-tunable key/value row. Read-only from the engine's side;
/// an absent row is a normal condition, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Dedup marker written once per ingested file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionLog {
    pub name: String,
    pub server_last_modified: i64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl IngestionLog {
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.modified = now;
    }
}
