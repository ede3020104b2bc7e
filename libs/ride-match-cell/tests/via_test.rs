use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use ride_match_cell::{TripSource, ViaClient, ViaError};
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.via_auth_url = format!("{}/oauth2/token", server.uri());
    config.via_api_url = server.uri();
    config
}

fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "expires_in": 3600
    }))
}

fn one_trip() -> serde_json::Value {
    json!({
        "trips": [{
            "trip_id": "t-1",
            "status": "CONFIRMED",
            "dropoff_eta": 1_710_000_000i64,
            "dropoff": {"lat": 41.8781, "lng": -87.6298}
        }]
    })
}

#[tokio::test]
async fn client_fails_without_credentials() {
    let mut config = TestConfig::default().to_app_config();
    config.via_client_id = String::new();

    assert_matches!(ViaClient::new(&config), Err(ViaError::NotConfigured));
}

#[tokio::test]
async fn fetches_trips_per_status_and_attaches_details() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(token_response("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .and(query_param("trip_status", "CONFIRMED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_trip()))
        .mount(&server)
        .await;

    // Every other status comes back empty.
    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trips": []})))
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/details"))
        .and(query_param("trip_id", "t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trip_details": {
                "driver_info": {"name": "Sam"},
                "vehicle_info": {"plate": "ABC-123"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ViaClient::new(&config_for(&server)).unwrap();
    let trips = client.trips_for("rider-1").await.unwrap();

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].trip_id, "t-1");
    assert_eq!(trips[0].driver_info, Some(json!({"name": "Sam"})));
    assert_eq!(trips[0].vehicle_info, Some(json!({"plate": "ABC-123"})));
}

#[tokio::test]
async fn failed_detail_lookup_leaves_fields_absent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(token_response("tok-1"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .and(query_param("trip_status", "FINISHED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_trip()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trips": []})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/details"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ViaClient::new(&config_for(&server)).unwrap();
    let trips = client.trips_for("rider-1").await.unwrap();

    assert_eq!(trips.len(), 1);
    assert!(trips[0].driver_info.is_none());
    assert!(trips[0].vehicle_info.is_none());
}

#[tokio::test]
async fn token_is_reused_across_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(token_response("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trips": []})))
        .expect(10)
        .mount(&server)
        .await;

    let client = ViaClient::new(&config_for(&server)).unwrap();
    client.trips_for("rider-1").await.unwrap();
    client.trips_for("rider-2").await.unwrap();
}

#[tokio::test]
async fn unauthorized_response_forces_one_refresh_and_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(token_response("tok-1"))
        .expect(2)
        .mount(&server)
        .await;

    // The first trips call is rejected; the retry with a fresh token and
    // every later call succeed.
    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trips": []})))
        .mount(&server)
        .await;

    let client = ViaClient::new(&config_for(&server)).unwrap();
    let trips = client.trips_for("rider-1").await.unwrap();
    assert!(trips.is_empty());
}

#[tokio::test]
async fn upstream_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(token_response("tok-1"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips/get"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ViaClient::new(&config_for(&server)).unwrap();
    let result = client.trips_for("rider-1").await;

    assert_matches!(result, Err(ViaError::Api { status: 503, .. }));
}
