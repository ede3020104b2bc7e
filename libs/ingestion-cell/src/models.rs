// libs/ingestion-cell/src/models.rs
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::Chicago;
use serde::Deserialize;

use crate::error::IngestError;

/// Timestamp format of the Veradigm file's local appointment date-time.
const VERADIGM_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a Veradigm appointment file drop. Column names match the
/// file header; the appointment instant is local US Central time.
#[derive(Debug, Clone, Deserialize)]
pub struct VeradigmRow {
    pub appointment_id: String,
    pub patient_number: String,
    pub patient_first_name: String,
    #[serde(default)]
    pub patient_middle_initial: String,
    pub patient_last_name: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub location_street1: String,
    #[serde(default)]
    pub location_street2: String,
    #[serde(default)]
    pub location_city: String,
    #[serde(default)]
    pub location_state: String,
    #[serde(default)]
    pub location_zip: String,
    pub appointment_datetime: String,
    pub appointment_duration: i64,
    pub status: String,
}

impl VeradigmRow {
    /// Full patient name with the middle initial collapsed when absent.
    pub fn patient_name(&self) -> String {
        [
            self.patient_first_name.as_str(),
            self.patient_middle_initial.as_str(),
            self.patient_last_name.as_str(),
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Location segments joined into one address string, empty segments
    /// collapsed.
    pub fn address(&self) -> String {
        [
            self.location_name.as_str(),
            self.location_street1.as_str(),
            self.location_street2.as_str(),
            self.location_city.as_str(),
            self.location_state.as_str(),
            self.location_zip.as_str(),
        ]
        .iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(",")
    }

    /// Local US-Central appointment instant converted to UTC.
    pub fn start_time_utc(&self) -> Result<DateTime<Utc>, IngestError> {
        let naive = NaiveDateTime::parse_from_str(&self.appointment_datetime, VERADIGM_DATETIME_FORMAT)
            .map_err(|e| {
                IngestError::MalformedRecord(format!(
                    "appointment {}: bad datetime '{}': {}",
                    self.appointment_id, self.appointment_datetime, e
                ))
            })?;
        let local = Chicago.from_local_datetime(&naive).earliest().ok_or_else(|| {
            IngestError::MalformedRecord(format!(
                "appointment {}: datetime '{}' does not exist in America/Chicago",
                self.appointment_id, self.appointment_datetime
            ))
        })?;
        Ok(local.with_timezone(&Utc))
    }
}
