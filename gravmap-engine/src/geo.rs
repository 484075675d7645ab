//! Planar approximation of squared distance on the sphere.

use once_cell::sync::Lazy;

/// Miles per degree of longitude at the equator.
const LON_MILES: f64 = 69.0;

/// Miles per degree of latitude.
const LAT_MILES: f64 = 69.172;

/// `cos(k°)` for k in [0, 89], filled on first use and immutable afterwards.
static COS_LAT: Lazy<[f64; 90]> = Lazy::new(|| {
    let mut table = [0.0; 90];
    for (deg, entry) in table.iter_mut().enumerate() {
        *entry = (deg as f64).to_radians().cos();
    }
    table
});

/// Squared distance in miles² between two `(lon, lat)` pairs in decimal
/// degrees.
///
/// East-west extent is scaled by the cosine of the average absolute latitude,
/// rounded to a whole degree and clamped to [0, 89]; longitude differences
/// wrap across the ±180 meridian. The approximation is planar: accurate on a
/// continental scale, not meaningful for antipodal or near-polar pairs.
pub fn distance_sq(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let avg_lat = ((lat1.abs() + lat2.abs()) / 2.0).round();
    let cos_lat = COS_LAT[(avg_lat as usize).min(89)];

    let mut d_lon = (lon2 - lon1).abs();
    if d_lon > 180.0 {
        d_lon = 360.0 - d_lon;
    }

    let x = d_lon * LON_MILES * cos_lat;
    let y = (lat2 - lat1) * LAT_MILES;
    x * x + y * y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        assert_eq!(distance_sq(0.0, 0.0, 1.0, 0.0), 69.0 * 69.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        assert_eq!(distance_sq(0.0, 0.0, 0.0, 1.0), 69.172 * 69.172);
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let d = distance_sq(-71.8, 42.58, -71.41, 42.27);
        assert_eq!(d, distance_sq(-71.41, 42.27, -71.8, 42.58));
    }

    #[test]
    fn wraps_across_the_meridian() {
        // (-179, 0) to (179, 0) spans 2 degrees of longitude, not 358.
        assert_eq!(
            distance_sq(-179.0, 0.0, 179.0, 0.0),
            distance_sq(0.0, 0.0, 2.0, 0.0)
        );
    }

    #[test]
    fn near_polar_pairs_stay_finite() {
        let d = distance_sq(0.0, 89.0, 180.0, 89.0);
        assert!(d.is_finite());
        assert!(d > 0.0);
    }

    #[test]
    fn average_latitude_above_89_clamps_into_the_table() {
        let d = distance_sq(0.0, 89.9, 1.0, 89.9);
        assert!(d.is_finite());
        assert!(d > 0.0);
    }
}
