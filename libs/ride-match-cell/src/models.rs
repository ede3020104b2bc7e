// libs/ride-match-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::{GeoPoint, Ride};

/// Trip statuses worth reconciling against. One provider query is issued
/// per status; everything else (cancelled, draft, ...) never matches.
pub const TRIP_STATUSES: [&str; 5] = ["CONFIRMED", "FINISHED", "ASSIGNED", "ARRIVED", "BOARDED"];

/// Transient trip as returned by the Via provider. Fetched per
/// reconciliation run and never stored directly; only the chosen trip,
/// reduced to a [`Ride`], is persisted on the appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub status: String,
    /// Drop-off ETA as epoch seconds.
    pub dropoff_eta: i64,
    #[serde(default)]
    pub dropoff: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<Value>,
}

impl From<&Trip> for Ride {
    fn from(trip: &Trip) -> Self {
        Ride {
            trip_id: Some(trip.trip_id.clone()),
            status: Some(trip.status.clone()),
            dropoff_eta: Some(trip.dropoff_eta),
            dropoff: trip.dropoff,
            driver_info: trip.driver_info.clone(),
            vehicle_info: trip.vehicle_info.clone(),
        }
    }
}

/// Operator-tunable bounds, in seconds, on how far a trip's drop-off may
/// precede (`prior_period`, positive) or follow (`subsequent_period`,
/// negative) an appointment's start time and still be considered a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    pub prior_period: i64,
    pub subsequent_period: i64,
}

impl Default for MatchWindow {
    fn default() -> Self {
        Self {
            prior_period: crate::services::settings::DEFAULT_PRIOR_PERIOD_SECS,
            subsequent_period: crate::services::settings::DEFAULT_SUBSEQUENT_PERIOD_SECS,
        }
    }
}
