// libs/ride-match-cell/src/services/merge.rs
use shared_models::Ride;

/// Decides which fields of a freshly computed ride carry forward from the
/// previously stored one.
///
/// When both sides reference the same underlying trip, driver and vehicle
/// detail already captured by an earlier fetch is preserved if the new
/// fetch came back without it. A different trip id means the new ride
/// wins outright; stale enrichment is never retained for a different
/// trip. The no-ride sentinel participates like any other value: it has
/// no trip id, so nothing is ever carried into or out of it.
pub fn merge_rides(existing: &Ride, mut new: Ride) -> Ride {
    let same_trip = match (&existing.trip_id, &new.trip_id) {
        (Some(existing_id), Some(new_id)) => existing_id == new_id,
        _ => false,
    };

    if same_trip {
        if new.driver_info.is_none() {
            new.driver_info = existing.driver_info.clone();
        }
        if new.vehicle_info.is_none() {
            new.vehicle_info = existing.vehicle_info.clone();
        }
    }

    new
}
