// libs/ride-match-cell/src/services/matcher.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use shared_models::{GeoPoint, Ride};

use crate::models::{MatchWindow, Trip};
use crate::services::location::LocationResolver;

/// Fixed spatial admissibility threshold between the geocoded appointment
/// address and a trip's drop-off point.
pub const MAX_LOCATION_DIFF_METERS: f64 = 100.0;

/// Initial "worst" best-so-far values; any admissible trip beats them.
const WORST_DIFF_SECS: i64 = 1_000_000_000;
const WORST_LOCATION_DIFF: f64 = 1e9;

/// Selects the single best-matching trip for an appointment, or the
/// no-ride sentinel when no trip is admissible.
///
/// Single linear pass with online best-so-far selection. A trip is
/// admissible iff its drop-off falls inside the temporal window
/// (`subsequent_period <= start - dropoff_eta <= prior_period`) and
/// within [`MAX_LOCATION_DIFF_METERS`] of the appointment address. An
/// admissible trip replaces the running best only when its time diff
/// strictly improves AND its location diff does not regress; a temporally
/// closer trip that is spatially worse than the current best is rejected.
/// Candidate ordering is provider-defined and must not be relied on.
pub async fn find_matching_ride(
    resolver: &dyn LocationResolver,
    address: &str,
    start_time: DateTime<Utc>,
    trips: &[Trip],
    window: MatchWindow,
) -> Result<Ride> {
    let start_ts = start_time.timestamp();
    let mut best: Option<&Trip> = None;
    let mut best_diff = WORST_DIFF_SECS;
    let mut best_location_diff = WORST_LOCATION_DIFF;

    for trip in trips {
        let diff = start_ts - trip.dropoff_eta;
        let dropoff = trip.dropoff.unwrap_or(GeoPoint { lat: 0.0, lng: 0.0 });
        let location_diff = resolver.distance_to(address, &dropoff).await?;

        debug!(
            "Trip {}: diff={}s (window [{}, {}]), location_diff={:.1}m (best: {}s / {:.1}m)",
            trip.trip_id,
            diff,
            window.subsequent_period,
            window.prior_period,
            location_diff,
            best_diff,
            best_location_diff
        );

        if window.subsequent_period <= diff
            && diff <= window.prior_period
            && diff < best_diff
            && location_diff <= MAX_LOCATION_DIFF_METERS
            && location_diff <= best_location_diff
        {
            best = Some(trip);
            best_diff = diff;
            best_location_diff = location_diff;
        }
    }

    match best {
        Some(trip) => {
            debug!("Matched trip {} for appointment at '{}'", trip.trip_id, address);
            Ok(Ride::from(trip))
        }
        None => Ok(Ride::no_ride()),
    }
}
