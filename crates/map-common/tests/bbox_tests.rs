//! Tests for bounding region computation.

use map_common::bbox::{bounds, BoundingRegion, BoundsAccumulator};
use map_common::GeoPoint;
use test_utils::{assert_coords_approx_eq, regions, Lcg};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_region_new() {
    let region = BoundingRegion::new(24.0, 27.0, -82.0, -80.0);
    assert_eq!(region.min_lat, 24.0);
    assert_eq!(region.max_lat, 27.0);
    assert_eq!(region.min_lon, -82.0);
    assert_eq!(region.max_lon, -80.0);
    assert_eq!(region.center, (25.5, -81.0));
}

#[test]
fn test_region_new_reorders_swapped_extremes() {
    let region = BoundingRegion::new(27.0, 24.0, -80.0, -82.0);
    assert!(region.min_lat <= region.max_lat);
    assert!(region.min_lon <= region.max_lon);
}

#[test]
fn test_region_from_point() {
    let region = BoundingRegion::from_point(26.0, -81.0);
    assert!(region.is_point());
    assert_eq!(region.center, (26.0, -81.0));
}

// ============================================================================
// bounds() tests
// ============================================================================

#[test]
fn test_bounds_empty_is_none() {
    let points: Vec<GeoPoint> = Vec::new();
    assert!(bounds(&points).is_none());
}

#[test]
fn test_bounds_single_point() {
    let points = vec![GeoPoint::new(26.1, -81.3)];
    let region = bounds(&points).unwrap();

    assert_eq!(region.min_lat, 26.1);
    assert_eq!(region.max_lat, 26.1);
    assert_eq!(region.min_lon, -81.3);
    assert_eq!(region.max_lon, -81.3);
    assert_eq!(region.center, (26.1, -81.3));
}

#[test]
fn test_bounds_scenario_two_points() {
    let points = vec![
        GeoPoint::new(26.2, -81.5).with_intensity(5.0),
        GeoPoint::new(26.5, -82.0),
    ];
    let region = bounds(&points).unwrap();

    assert_eq!(region.min_lat, 26.2);
    assert_eq!(region.max_lat, 26.5);
    assert_eq!(region.min_lon, -82.0);
    assert_eq!(region.max_lon, -81.5);
    assert_coords_approx_eq!(region.center, (26.35, -81.75), 1e-9);
}

#[test]
fn test_bounds_center_is_box_midpoint_not_centroid() {
    // Three points bunched at the south end, one outlier to the north
    let points = vec![
        GeoPoint::new(25.0, -81.0),
        GeoPoint::new(25.0, -81.0),
        GeoPoint::new(25.0, -81.0),
        GeoPoint::new(27.0, -81.0),
    ];
    let region = bounds(&points).unwrap();
    assert_eq!(region.center.0, 26.0);
}

#[test]
fn test_bounds_skips_malformed_entries() {
    let points = vec![
        GeoPoint::new(f64::NAN, -81.0),
        GeoPoint::new(26.0, f64::INFINITY),
        GeoPoint::new(26.4, -81.4),
    ];
    let region = bounds(&points).unwrap();
    assert!(region.min_lat.is_finite());
    assert_eq!(region.min_lat, 26.4);
    assert_eq!(region.max_lon, -81.4);
}

#[test]
fn test_bounds_all_malformed_is_none() {
    let points = vec![GeoPoint::new(f64::NAN, f64::NAN)];
    assert!(bounds(&points).is_none());
}

#[test]
fn test_bounds_invariant_min_le_max() {
    let (min_lat, max_lat, min_lon, max_lon) = regions::SOUTHWEST_FLORIDA;
    let mut rng = Lcg::new(7);
    let points: Vec<GeoPoint> = (0..50)
        .map(|_| GeoPoint::new(rng.range(min_lat, max_lat), rng.range(min_lon, max_lon)))
        .collect();
    let region = bounds(&points).unwrap();

    assert!(region.min_lat <= region.max_lat);
    assert!(region.min_lon <= region.max_lon);
    assert!(region.min_lat >= min_lat && region.max_lat < max_lat);
    assert!(region.min_lon >= min_lon && region.max_lon < max_lon);
    for p in &points {
        assert!(region.contains(p.lat, p.lon));
    }
}

// ============================================================================
// Accumulator and helpers
// ============================================================================

#[test]
fn test_accumulator_count() {
    let mut acc = BoundsAccumulator::default();
    acc.push(1.0, 2.0);
    acc.push(3.0, 4.0);
    acc.push(f64::NAN, 4.0);
    assert_eq!(acc.count(), 2);
}

#[test]
fn test_region_union() {
    let a = BoundingRegion::new(25.0, 26.0, -82.0, -81.0);
    let b = BoundingRegion::new(25.5, 27.0, -81.5, -80.0);
    let u = a.union(&b);
    assert_eq!(u.min_lat, 25.0);
    assert_eq!(u.max_lat, 27.0);
    assert_eq!(u.min_lon, -82.0);
    assert_eq!(u.max_lon, -80.0);
}

#[test]
fn test_region_corners() {
    let region = BoundingRegion::new(25.0, 26.0, -82.0, -81.0);
    assert_eq!(region.corners(), [[25.0, -82.0], [26.0, -81.0]]);
}

#[test]
fn test_region_serializes_camel_case() {
    let region = BoundingRegion::new(26.2, 26.5, -82.0, -81.5);
    let json = serde_json::to_value(region).unwrap();
    assert_eq!(json["minLat"], 26.2);
    assert_eq!(json["maxLon"], -81.5);
    assert!(json["center"].is_array());
}
