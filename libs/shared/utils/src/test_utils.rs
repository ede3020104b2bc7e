// libs/shared/utils/src/test_utils.rs
use chrono::{DateTime, Duration, Utc};

use shared_config::{AppConfig, ReconcilerMode};
use shared_models::{Appointment, Patient, Provider, Ride, STATUS_BOOKED};

pub struct TestConfig {
    pub store_url: String,
    pub via_auth_url: String,
    pub via_api_url: String,
    pub epic_base_url: String,
    pub geocoder_url: String,
    pub object_store_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            via_auth_url: "http://localhost:54322/oauth2/token".to_string(),
            via_api_url: "http://localhost:54323".to_string(),
            epic_base_url: "http://localhost:54324".to_string(),
            geocoder_url: "http://localhost:54325".to_string(),
            object_store_url: "http://localhost:54326".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: "test-service-key".to_string(),
            via_auth_url: self.via_auth_url.clone(),
            via_api_url: self.via_api_url.clone(),
            via_client_id: "test-client-id".to_string(),
            via_client_secret: "test-client-secret".to_string(),
            via_api_key: "test-api-key".to_string(),
            epic_base_url: self.epic_base_url.clone(),
            epic_api_token: "test-epic-token".to_string(),
            geocoder_url: self.geocoder_url.clone(),
            object_store_url: self.object_store_url.clone(),
            reconciler_mode: ReconcilerMode::Dual,
        }
    }
}

/// Booked appointment ending an hour after `start`, with no ride assigned.
pub fn booked_appointment(id: &str, patient_id: &str, start: DateTime<Utc>) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        patient_name: "Test Patient".to_string(),
        location: "600 W Chicago Ave,Chicago,IL,60654".to_string(),
        start_time: start,
        end_time: start + Duration::hours(1),
        status: STATUS_BOOKED.to_string(),
        provider: Provider::Epic,
        ride: Ride::no_ride(),
        created: Utc::now(),
        modified: Utc::now(),
    }
}

pub fn mapped_patient(patient_id: &str, rider_id: &str, provider: Provider) -> Patient {
    Patient {
        patient_id: patient_id.to_string(),
        name: "Test Patient".to_string(),
        via_rider_id: rider_id.to_string(),
        provider,
        created: Utc::now(),
        modified: Utc::now(),
    }
}
