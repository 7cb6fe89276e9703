//! Great-circle distance between two coordinates.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two lat/lng pairs, in meters.
///
/// Pure function; accuracy is well within a meter at the scales the
/// consensus thresholds care about (single to low hundreds of meters).
#[must_use]
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
