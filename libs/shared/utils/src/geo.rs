// libs/shared/utils/src/geo.rs
use shared_models::GeoPoint;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = GeoPoint { lat: 41.8781, lng: -87.6298 };
        assert!(haversine_meters(&p, &p) < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint { lat: 41.8781, lng: -87.6298 };
        let b = GeoPoint { lat: 41.8800, lng: -87.6300 };
        let ab = haversine_meters(&a, &b);
        let ba = haversine_meters(&b, &a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111km() {
        let a = GeoPoint { lat: 41.0, lng: -87.0 };
        let b = GeoPoint { lat: 42.0, lng: -87.0 };
        let d = haversine_meters(&a, &b);
        assert!((d - 111_195.0).abs() < 500.0, "got {}", d);
    }
}
