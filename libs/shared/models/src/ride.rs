// libs/shared/models/src/ride.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Persisted trip summary stored on an appointment. The canonical
/// "no ride found" value is `Ride::no_ride()`; an appointment's ride is
/// never null or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Ride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff_eta: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<Value>,
}

impl Ride {
    pub fn no_ride() -> Self {
        Self::default()
    }

    pub fn is_no_ride(&self) -> bool {
        self.trip_id.is_none()
    }
}
