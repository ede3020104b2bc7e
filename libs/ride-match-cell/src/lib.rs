// libs/ride-match-cell/src/lib.rs
//! # Ride Match Cell
//!
//! Core of the ride-appointment reconciliation engine: the matching
//! heuristic that pairs an appointment with a candidate ride-share trip
//! under temporal and spatial constraints, and the incremental-merge rule
//! that protects previously enriched ride fields from being overwritten
//! by less-complete re-fetches.
//!
//! ```text
//! +-----------------------------------------------------+
//! |                 Ride Match Cell                     |
//! +-----------------------------------------------------+
//! |  models.rs      |  Trip, MatchWindow                |
//! |  error.rs       |  Via client error taxonomy        |
//! |  services/      |                                   |
//! |    matcher.rs   |  best-so-far trip selection       |
//! |    merge.rs     |  ride field carry-forward rule    |
//! |    settings.rs  |  per-run window resolution        |
//! |    location.rs  |  geocoding + geodesic distance    |
//! |    via.rs       |  Via trip provider client         |
//! +-----------------------------------------------------+
//! ```

pub mod error;
pub mod models;
pub mod services;

pub use error::ViaError;
pub use models::{MatchWindow, Trip, TRIP_STATUSES};
pub use services::location::{GeocodingResolver, LocationResolver};
pub use services::matcher::{find_matching_ride, MAX_LOCATION_DIFF_METERS};
pub use services::merge::merge_rides;
pub use services::settings::MatchSettings;
pub use services::via::{TripSource, ViaClient};
