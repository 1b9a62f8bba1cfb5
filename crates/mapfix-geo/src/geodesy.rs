//! Spherical geodesy between GPS fixes.
//!
//! Mean-radius sphere throughout; good to a few meters over the walking
//! distances a site map covers.

use mapfix_core::constants::EARTH_RADIUS_M;
use mapfix_core::types::GeoPoint;

use crate::angle::normalize_degrees;

/// Great-circle distance in meters (haversine).
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `from` to `to`, in `[0, 360)`.
///
/// Coincident points give atan2(0, 0) = 0.
pub fn bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat_from = from.latitude.to_radians();
    let lat_to = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat_to.cos();
    let x = lat_from.cos() * lat_to.sin() - lat_from.sin() * lat_to.cos() * delta_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_m` from `from` along initial bearing `bearing_deg`.
///
/// Only latitude/longitude are set on the result.
pub fn destination(from: &GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let brng = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    // Longitude back into [-180, 180)
    let lon2 = normalize_degrees(lon2.to_degrees() + 180.0) - 180.0;

    GeoPoint::new(lat2.to_degrees(), lon2)
}
