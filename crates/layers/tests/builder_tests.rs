//! Tests for layer construction in both visualization modes.

use layers::{LayerConfig, SpatialLayer, SpatialLayerBuilder, VisualizationMode};
use map_common::{bounds, GeoPoint};
use projection::BatchReprojector;
use test_utils::{create_geographic_rows, create_stacked_rows, regions, rows};

fn reproject(rows: &[map_common::RawPoint]) -> Vec<GeoPoint> {
    BatchReprojector::default().reproject_all(rows)
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn test_empty_input_builds_empty_layers() {
    let builder = SpatialLayerBuilder::default();

    for mode in [VisualizationMode::Density, VisualizationMode::Cluster] {
        let layer = builder.build(&[], mode);
        assert!(layer.is_empty(), "{:?} layer should be empty", mode);
        assert!(layer.region().is_none());
    }
}

// ============================================================================
// Density mode
// ============================================================================

#[test]
fn test_density_layer_carries_weights() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&rows::scenario_two_points());

    let layer = builder.build(&points, VisualizationMode::Density);
    let surface = layer.as_density().expect("density layer");

    assert_eq!(surface.len(), 2);
    assert_eq!(surface.weighted_points[0].intensity, 5.0);
    assert_eq!(surface.weighted_points[1].intensity, 1.0);
    assert_eq!(surface.max_intensity, 5.0);
    assert_eq!(surface.radius, 20.0);
    assert_eq!(surface.blur, 20.0);
    assert_eq!(surface.gradient.stops().len(), 5);
}

#[test]
fn test_density_region_matches_bounds() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&create_geographic_rows(40, regions::SOUTHWEST_FLORIDA, 3));

    let layer = builder.build(&points, VisualizationMode::Density);
    assert_eq!(layer.region(), bounds(&points));
}

#[test]
fn test_density_layer_json_shape() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&rows::scenario_two_points());
    let json = serde_json::to_value(builder.build(&points, VisualizationMode::Density)).unwrap();

    assert_eq!(json["kind"], "densitySurface");
    assert_eq!(json["weightedPoints"][0], serde_json::json!([26.2, -81.5, 5.0]));
    assert_eq!(json["gradient"][0]["color"], "#0000ff");
}

// ============================================================================
// Cluster mode
// ============================================================================

#[test]
fn test_hundred_identical_points_form_one_cluster() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&create_stacked_rows(100, 26.2, -81.5));

    let layer = builder.build(&points, VisualizationMode::Cluster);
    let cluster_layer = layer.as_cluster().expect("cluster layer");
    assert_eq!(cluster_layer.len(), 100);

    let below = cluster_layer.decluster_zoom - 1;
    let clusters = cluster_layer.clusters_at(below);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 100);
    assert!(clusters[0].region.is_point());

    let declustered = cluster_layer.clusters_at(cluster_layer.decluster_zoom);
    assert_eq!(declustered.len(), 100);
}

#[test]
fn test_cluster_captions() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&rows::mortality_geographic());

    let layer = builder.build(&points, VisualizationMode::Cluster);
    let markers = &layer.as_cluster().unwrap().markers;

    assert_eq!(
        markers[0].caption,
        "Location: 26.2000°N, 81.5000°W\nCount: 3\nCause: Vehicle"
    );
    assert_eq!(
        markers[1].caption,
        "Location: 26.1000°N, 81.4000°W\nCause: Intraspecific aggression"
    );
}

#[test]
fn test_cluster_config_applied() {
    let mut config = LayerConfig::default();
    config.cluster.max_cluster_radius = 40.0;
    config.cluster.disable_clustering_at_zoom = 12;

    let builder = SpatialLayerBuilder::new(config);
    let layer = builder.build(&[GeoPoint::new(26.0, -81.0)], VisualizationMode::Cluster);

    match layer {
        SpatialLayer::ClusterLayer(c) => {
            assert_eq!(c.cluster_radius, 40.0);
            assert_eq!(c.decluster_zoom, 12);
            assert_eq!(c.marker_style.radius, 6.0);
        }
        SpatialLayer::DensitySurface(_) => panic!("expected cluster layer"),
    }
}

#[test]
fn test_clusters_cover_every_marker_once() {
    let builder = SpatialLayerBuilder::default();
    let points = reproject(&create_geographic_rows(300, regions::SOUTHWEST_FLORIDA, 21));
    let layer = builder.build(&points, VisualizationMode::Cluster);
    let cluster_layer = layer.as_cluster().unwrap();

    for zoom in [8u8, 10, 12, 14] {
        let clusters = cluster_layer.clusters_at(zoom);
        let mut seen: Vec<usize> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..300).collect::<Vec<_>>(), "zoom {}", zoom);
    }

    // Zooming in never merges more
    assert!(cluster_layer.clusters_at(8).len() <= cluster_layer.clusters_at(14).len());
}
