use geodata::GeoPoint;
use serde::Serialize;

use crate::precision::round_3dp;

/// A representative point for one polygon, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Centroid {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

/// Vertex-average centroid of a ring.
///
/// This is the arithmetic mean of the vertices, not an area-weighted polygon
/// centroid; for concave or self-intersecting rings the result may fall
/// outside the polygon. Pairs with a non-finite component are skipped, not
/// treated as zero. Returns `None` when no valid pair survives the filter.
/// Both components are rounded to 3 decimals.
pub fn resolve_centroid(ring: &[GeoPoint]) -> Option<Centroid> {
    let mut lon_sum = 0.0;
    let mut lat_sum = 0.0;
    let mut count = 0usize;

    for point in ring {
        if !point.is_finite() {
            continue;
        }
        lon_sum += point.lon_deg;
        lat_sum += point.lat_deg;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(Centroid {
        lon_deg: round_3dp(lon_sum / count as f64),
        lat_deg: round_3dp(lat_sum / count as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::{Centroid, resolve_centroid};
    use geodata::GeoPoint;
    use pretty_assertions::assert_eq;

    fn ring(pairs: &[(f64, f64)]) -> Vec<GeoPoint> {
        pairs
            .iter()
            .map(|&(lon, lat)| GeoPoint::new(lon, lat))
            .collect()
    }

    #[test]
    fn square_ring_averages_to_its_center() {
        let r = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let c = resolve_centroid(&r).expect("centroid");
        assert_eq!(
            c,
            Centroid {
                lon_deg: 1.0,
                lat_deg: 1.0
            }
        );
    }

    #[test]
    fn empty_ring_has_no_centroid() {
        assert_eq!(resolve_centroid(&[]), None);
    }

    #[test]
    fn all_invalid_pairs_have_no_centroid() {
        let r = ring(&[(f64::NAN, 1.0), (2.0, f64::NAN), (f64::NAN, f64::NAN)]);
        assert_eq!(resolve_centroid(&r), None);
    }

    #[test]
    fn nan_pairs_are_excluded_from_sum_and_count() {
        let r = ring(&[(3.0, 4.0), (f64::NAN, 100.0)]);
        let c = resolve_centroid(&r).expect("centroid");
        assert_eq!(c.lon_deg, 3.0);
        assert_eq!(c.lat_deg, 4.0);
    }

    #[test]
    fn infinite_pairs_are_excluded_too() {
        let r = ring(&[(1.0, 1.0), (f64::INFINITY, 1.0)]);
        let c = resolve_centroid(&r).expect("centroid");
        assert_eq!(c.lon_deg, 1.0);
        assert_eq!(c.lat_deg, 1.0);
    }

    #[test]
    fn components_round_to_three_decimals() {
        // Averages to (1.23456, 1.2345): checks the rule and its boundary.
        let r = ring(&[(1.23456, 1.2345), (1.23456, 1.2345)]);
        let c = resolve_centroid(&r).expect("centroid");
        assert_eq!(c.lon_deg, 1.235);
        assert_eq!(c.lat_deg, 1.235);
    }
}
