//! Great-circle distance, bearing and translation

use super::Point;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Haversine great-circle distance between two points, in meters
pub fn distance_meters(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Initial compass bearing from `from` toward `to`, in degrees within [-180, 180]
pub fn bearing_degrees(from: &Point, to: &Point) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x).to_degrees()
}

/// Move `point` along a great circle by `distance` meters on the given bearing.
///
/// The accuracy radius of the input is carried over unchanged.
pub fn translate(point: &Point, distance: f64, bearing: f64) -> Point {
    let angular = distance / EARTH_RADIUS_METERS;
    let theta = bearing.to_radians();
    let lat1 = point.lat.to_radians();
    let lon1 = point.lon.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    // normalise to [-180, 180)
    let lon = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;

    Point { lon, lat: lat2.to_degrees(), accuracy: point.accuracy }
}
