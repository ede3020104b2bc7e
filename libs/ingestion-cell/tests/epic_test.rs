use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use ingestion_cell::{EpicAdapter, EpicClient, IngestError};
use shared_database::{MemoryStore, RecordStore};
use shared_models::Provider;
use shared_utils::test_utils::TestConfig;

fn client_for(server: &MockServer) -> EpicClient {
    let mut config = TestConfig::default().to_app_config();
    config.epic_base_url = server.uri();
    EpicClient::new(&config)
}

fn mapping() -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    mapping.insert("p-1".to_string(), "r-1".to_string());
    mapping
}

fn entry(id: &str) -> serde_json::Value {
    json!({
        "resource": {
            "Appointment": {
                "id": {"@value": id},
                "status": {"@value": "Booked"},
                "start": {"@value": "2024-03-10T16:00:00Z"},
                "end": {"@value": "2024-03-10T17:00:00Z"},
                "participant": [
                    {
                        "actor": {
                            "reference": {"@value": "Patient/p-1"},
                            "display": {"@value": "Jane Doe"}
                        }
                    },
                    {
                        "actor": {
                            "reference": {"@value": "Location/loc-1"}
                        }
                    }
                ]
            }
        }
    })
}

async fn mount_location(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Location/loc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Location": {"address": {"text": {"@value": "Clinic,600 W Chicago Ave,Chicago,IL"}}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn parses_bundle_entries_into_unmatched_appointments() {
    let server = MockServer::start().await;
    mount_location(&server).await;

    Mock::given(method("GET"))
        .and(path("/Appointment"))
        .and(query_param("patient", "p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Bundle": {"entry": [entry("ap-1")]}
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let adapter = EpicAdapter::new(client_for(&server), store.clone());
    adapter.ingest(&mapping()).await.unwrap();

    let appointment = store.get_appointment("ap-1").await.unwrap().unwrap();
    assert_eq!(appointment.patient_id, "p-1");
    assert_eq!(appointment.patient_name, "Jane Doe");
    assert_eq!(appointment.location, "Clinic,600 W Chicago Ave,Chicago,IL");
    assert_eq!(appointment.status, "Booked");
    assert_eq!(appointment.provider, Provider::Epic);
    assert_eq!(appointment.start_time.to_rfc3339(), "2024-03-10T16:00:00+00:00");
    assert_eq!(appointment.end_time.to_rfc3339(), "2024-03-10T17:00:00+00:00");
    // Matching for this provider happens in the scheduled full pass.
    assert!(appointment.ride.is_no_ride());
}

#[tokio::test]
async fn malformed_entry_is_skipped_and_the_batch_proceeds() {
    let server = MockServer::start().await;
    mount_location(&server).await;

    let mut broken = entry("ap-2");
    broken["resource"]["Appointment"]
        .as_object_mut()
        .unwrap()
        .remove("start");

    Mock::given(method("GET"))
        .and(path("/Appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Bundle": {"entry": [broken, entry("ap-1")]}
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let adapter = EpicAdapter::new(client_for(&server), store.clone());
    adapter.ingest(&mapping()).await.unwrap();

    assert_eq!(store.appointment_count().await, 1);
    assert!(store.get_appointment("ap-1").await.unwrap().is_some());
}

#[tokio::test]
async fn empty_bundle_commits_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Bundle": {}})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let adapter = EpicAdapter::new(client_for(&server), store.clone());
    adapter.ingest(&mapping()).await.unwrap();

    assert_eq!(store.appointment_count().await, 0);
}

#[tokio::test]
async fn upstream_failure_fails_the_invocation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Appointment"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let adapter = EpicAdapter::new(client_for(&server), store.clone());

    assert_matches!(adapter.ingest(&mapping()).await, Err(IngestError::Epic(_)));
}
