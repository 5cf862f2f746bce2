//! Spherical geodesy on points given as (x = longitude, y = latitude) degrees.
//!
//! All functions use a spherical Earth of radius [`EARTH_RADIUS_M`].

use geo::Point;

use crate::EARTH_RADIUS_M;

/// Initial compass bearing from `a` towards `b`, in degrees within [0, 360).
///
/// Undefined for coincident points; callers guard zero-length segments.
pub fn bearing(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Great-circle (haversine) distance between `a` and `b` in meters
pub fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Absolute difference between two bearings, taking the short way round.
///
/// Result lies in [0, 180], so 350° -> 10° is a 20° change.
pub fn bearing_change(from: f64, to: f64) -> f64 {
    ((to - from + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Point reached by travelling `distance_m` from `origin` along the
/// initial bearing `bearing_deg`
pub fn destination(origin: Point<f64>, bearing_deg: f64, distance_m: f64) -> Point<f64> {
    let lat1 = origin.y().to_radians();
    let lon1 = origin.x().to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon2 = (lon2.to_degrees() + 540.0) % 360.0 - 180.0;
    Point::new(lon2, lat2.to_degrees())
}
