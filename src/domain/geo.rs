//! Great-circle distance estimation.

use super::entities::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in km between two points.
///
/// A lower bound on road distance: fast and deterministic, but ignores road
/// topology. Used only to pick the shortlist; the accurate re-scoring stage
/// replaces it with real routing data.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
