use serde_json::json;

use ride_match_cell::merge_rides;
use shared_models::Ride;

fn ride(trip_id: &str) -> Ride {
    Ride {
        trip_id: Some(trip_id.to_string()),
        status: Some("CONFIRMED".to_string()),
        dropoff_eta: Some(1_710_000_000),
        dropoff: None,
        driver_info: None,
        vehicle_info: None,
    }
}

#[test]
fn same_trip_preserves_driver_info_missing_from_new_fetch() {
    let mut existing = ride("t-1");
    existing.driver_info = Some(json!({"name": "Sam", "phone": "555-0100"}));

    let new = ride("t-1");
    let merged = merge_rides(&existing, new);

    assert_eq!(merged.trip_id.as_deref(), Some("t-1"));
    assert_eq!(
        merged.driver_info,
        Some(json!({"name": "Sam", "phone": "555-0100"}))
    );
}

#[test]
fn same_trip_preserves_vehicle_info_missing_from_new_fetch() {
    let mut existing = ride("t-1");
    existing.vehicle_info = Some(json!({"plate": "ABC-123"}));

    let merged = merge_rides(&existing, ride("t-1"));
    assert_eq!(merged.vehicle_info, Some(json!({"plate": "ABC-123"})));
}

#[test]
fn same_trip_keeps_fresher_enrichment_when_new_has_it() {
    let mut existing = ride("t-1");
    existing.driver_info = Some(json!({"name": "Sam"}));

    let mut new = ride("t-1");
    new.driver_info = Some(json!({"name": "Alex"}));

    let merged = merge_rides(&existing, new);
    assert_eq!(merged.driver_info, Some(json!({"name": "Alex"})));
}

#[test]
fn different_trip_wins_outright_with_no_carry_over() {
    let mut existing = ride("t-1");
    existing.driver_info = Some(json!({"name": "Sam"}));
    existing.vehicle_info = Some(json!({"plate": "ABC-123"}));

    let new = ride("t-2");
    let merged = merge_rides(&existing, new.clone());

    assert_eq!(merged, new);
}

#[test]
fn sentinel_to_sentinel_is_a_no_op() {
    let merged = merge_rides(&Ride::no_ride(), Ride::no_ride());
    assert!(merged.is_no_ride());
}

#[test]
fn real_ride_replacing_sentinel_carries_nothing() {
    let new = ride("t-1");
    let merged = merge_rides(&Ride::no_ride(), new.clone());
    assert_eq!(merged, new);
}

#[test]
fn sentinel_replacing_real_ride_drops_enrichment() {
    let mut existing = ride("t-1");
    existing.driver_info = Some(json!({"name": "Sam"}));

    let merged = merge_rides(&existing, Ride::no_ride());
    assert!(merged.is_no_ride());
    assert!(merged.driver_info.is_none());
}
