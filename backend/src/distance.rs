use crate::models::Coordinate;

/// Statute miles per nautical mile of arc (one arc-minute).
const MILES_PER_ARC_MINUTE: f64 = 1.1515;
const METERS_PER_MILE: f64 = 1609.344;

/// Great-circle distance in meters using the spherical law of cosines.
///
/// The cosine term is clamped into `[-1, 1]` so floating point overshoot on
/// identical or antipodal points never produces `NaN`.
pub fn great_circle_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let theta = (a.lng - b.lng).to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * theta.cos();
    let angle_deg = cosine.clamp(-1.0, 1.0).acos().to_degrees();

    angle_deg * 60.0 * MILES_PER_ARC_MINUTE * METERS_PER_MILE
}

pub fn path_length_m(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| great_circle_m(w[0], w[1])).sum()
}
