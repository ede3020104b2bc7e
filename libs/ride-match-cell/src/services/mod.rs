// libs/ride-match-cell/src/services/mod.rs

pub mod location;
pub mod matcher;
pub mod merge;
pub mod settings;
pub mod via;

pub use location::{GeocodingResolver, LocationResolver};
pub use matcher::find_matching_ride;
pub use merge::merge_rides;
pub use settings::MatchSettings;
pub use via::{TripSource, ViaClient};
