//! Point-by-point potential between regions.

use crate::geo::distance_sq;
use crate::region::Point;

/// Gravitational-style attraction between two member sets:
/// `Σ w_a · w_b / d(a, b)⁴`, with `d⁴ = d² · d²` from the planar kernel.
///
/// Coincident members divide by zero and contribute `+∞`. That is the
/// intended signal that the owning regions must merge next, so the infinity
/// is propagated, not guarded against.
pub fn pair_potential(a: &[Point], b: &[Point]) -> f64 {
    let mut pot = 0.0;
    for pa in a {
        for pb in b {
            let d2 = distance_sq(pa.lon, pa.lat, pb.lon, pb.lat);
            pot += pa.weight * pb.weight / (d2 * d2);
        }
    }
    pot
}

/// The physically closest pair of members between two regions: indices into
/// `a` and `b` plus the squared distance in miles². Consumed by the
/// edge-graph renderer, not by the merge loop.
pub fn closest_pair(a: &[Point], b: &[Point]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, pa) in a.iter().enumerate() {
        for (j, pb) in b.iter().enumerate() {
            let d2 = distance_sq(pa.lon, pa.lat, pb.lon, pb.lat);
            match best {
                Some((_, _, nearest)) if nearest <= d2 => {}
                _ => best = Some((i, j, d2)),
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lon: f64, lat: f64, weight: f64) -> Point {
        Point { lon, lat, weight }
    }

    #[test]
    fn matches_the_hand_computed_value() {
        // One degree apart on the equator: d² = 69², d⁴ = 69⁴.
        let a = [point(0.0, 0.0, 2.0)];
        let b = [point(1.0, 0.0, 3.0)];
        let expected = 6.0 / (69.0_f64.powi(4));
        let pot = pair_potential(&a, &b);
        assert!((pot - expected).abs() <= expected * 1e-12);
    }

    #[test]
    fn coincident_points_attract_infinitely() {
        let a = [point(5.0, 5.0, 1.0)];
        let b = [point(5.0, 5.0, 2.0), point(6.0, 5.0, 1.0)];
        assert_eq!(pair_potential(&a, &b), f64::INFINITY);
    }

    #[test]
    fn symmetric_for_singletons() {
        let a = [point(-71.8, 42.58, 4.0)];
        let b = [point(-71.41, 42.27, 9.0)];
        assert_eq!(pair_potential(&a, &b), pair_potential(&b, &a));
    }

    #[test]
    fn additive_over_a_member_split() {
        let p = [point(0.0, 0.0, 1.0), point(0.5, 0.5, 2.0)];
        let q = [point(2.0, 1.0, 3.0)];
        let r = [point(5.0, 5.0, 1.0), point(6.0, 4.0, 2.0), point(7.0, 3.0, 4.0)];

        let mut union = p.to_vec();
        union.extend_from_slice(&q);

        let direct = pair_potential(&union, &r);
        let split = pair_potential(&p, &r) + pair_potential(&q, &r);
        assert!((direct - split).abs() <= direct * 1e-12);
    }

    #[test]
    fn closest_pair_finds_the_minimum() {
        let a = [point(0.0, 0.0, 1.0), point(10.0, 0.0, 1.0)];
        let b = [point(20.0, 0.0, 1.0), point(11.0, 0.0, 1.0)];
        let (i, j, d2) = closest_pair(&a, &b).unwrap();
        assert_eq!((i, j), (1, 1));
        assert_eq!(d2, distance_sq(10.0, 0.0, 11.0, 0.0));
    }

    #[test]
    fn closest_pair_of_empty_sets_is_none() {
        assert_eq!(closest_pair(&[], &[point(0.0, 0.0, 1.0)]), None);
    }
}
