//! Tests for the viewport lifecycle and deferred pipeline.

use layers::VisualizationMode;
use map_common::InputMode;
use test_utils::{create_geographic_rows, create_stacked_rows, regions, rows};
use viewport::{
    HostEvent, MapConfig, MapHost, MapPipeline, RecordingHost, ViewportController, ViewportState,
};

fn pipeline() -> MapPipeline<RecordingHost> {
    MapPipeline::new(RecordingHost::default(), &MapConfig::default())
}

// ============================================================================
// Single attached layer
// ============================================================================

#[test]
fn test_two_data_sets_leave_one_layer() {
    let mut pipeline = pipeline();

    pipeline.update_now(rows::scenario_two_points(), VisualizationMode::Density);
    assert_eq!(pipeline.controller().host().layer_count(), 1);

    pipeline.update_now(rows::mortality_geographic(), VisualizationMode::Cluster);
    let host = pipeline.controller().host();
    assert_eq!(host.layer_count(), 1);

    let attached = host.layers().next().unwrap();
    assert_eq!(attached.mode(), VisualizationMode::Cluster);
    assert_eq!(attached.len(), 3);
}

#[test]
fn test_mode_switch_on_same_data() {
    let mut pipeline = pipeline();
    let data = create_geographic_rows(25, regions::SOUTHWEST_FLORIDA, 4);

    for mode in [
        VisualizationMode::Density,
        VisualizationMode::Cluster,
        VisualizationMode::Density,
    ] {
        pipeline.update_now(data.clone(), mode);
        assert_eq!(pipeline.controller().host().layer_count(), 1);
        assert_eq!(pipeline.controller().layer().unwrap().mode(), mode);
    }
}

#[test]
fn test_each_transition_detaches_before_attaching() {
    let mut pipeline = pipeline();
    for _ in 0..3 {
        pipeline.update_now(rows::scenario_two_points(), VisualizationMode::Density);
    }

    // Layer count never exceeds one between consecutive events
    let mut live = 0i32;
    for event in pipeline.controller().host().events() {
        match event {
            HostEvent::Added { .. } => live += 1,
            HostEvent::Removed { .. } => live -= 1,
            HostEvent::Fitted { .. } => {}
        }
        assert!((0..=1).contains(&live), "live layers = {}", live);
    }
}

#[test]
fn test_fit_uses_bounds_and_padding() {
    let mut pipeline = pipeline();
    pipeline.update_now(rows::scenario_two_points(), VisualizationMode::Density);

    let (region, padding) = pipeline.controller().host().last_fit().unwrap();
    assert_eq!(padding, 50.0);
    assert_eq!((region.min_lat, region.max_lat), (26.2, 26.5));
    assert_eq!((region.min_lon, region.max_lon), (-82.0, -81.5));
    assert_eq!(pipeline.controller().host().camera().center, region.center);
}

#[test]
fn test_all_rows_dropped_clears_viewport() {
    let mut pipeline = pipeline();
    pipeline.update_now(rows::scenario_two_points(), VisualizationMode::Cluster);
    pipeline.update_now(rows::corrupt(), VisualizationMode::Cluster);

    assert_eq!(pipeline.controller().state(), ViewportState::Empty);
    assert_eq!(pipeline.controller().host().layer_count(), 0);
}

// ============================================================================
// Last-write-wins
// ============================================================================

#[test]
fn test_stale_result_is_discarded() {
    let mut pipeline = pipeline();

    let first = pipeline.submit(rows::scenario_two_points(), VisualizationMode::Density);
    let stale_view = pipeline.prepare(&rows::scenario_two_points(), VisualizationMode::Density);

    let second = pipeline.submit(rows::mortality_geographic(), VisualizationMode::Cluster);
    assert!(!pipeline.apply(first, stale_view));
    assert_eq!(pipeline.controller().state(), ViewportState::Empty);

    assert_eq!(pipeline.run_pending(), Some(second));
    let layer = pipeline.controller().layer().unwrap();
    assert_eq!(layer.mode(), VisualizationMode::Cluster);
    assert_eq!(pipeline.controller().host().layer_count(), 1);
}

#[test]
fn test_superseded_submission_never_runs() {
    let mut pipeline = pipeline();
    pipeline.submit(create_stacked_rows(5, 26.0, -81.0), VisualizationMode::Density);
    pipeline.submit(create_stacked_rows(7, 26.0, -81.0), VisualizationMode::Density);

    assert!(pipeline.run_pending().is_some());
    assert!(pipeline.run_pending().is_none());
    assert_eq!(pipeline.controller().layer().unwrap().len(), 7);
    assert_eq!(pipeline.controller().host().events().len(), 2);
}

#[test]
fn test_deferred_matches_eager() {
    let data = create_geographic_rows(60, regions::SOUTHWEST_FLORIDA, 8);

    let mut eager = pipeline();
    eager.update_now(data.clone(), VisualizationMode::Cluster);

    let mut deferred = pipeline();
    deferred.submit(data, VisualizationMode::Cluster);
    deferred.run_pending();

    assert_eq!(eager.controller().layer(), deferred.controller().layer());
    assert_eq!(
        eager.controller().host().camera(),
        deferred.controller().host().camera()
    );
}

#[test]
fn test_clear_cancels_pending() {
    let mut pipeline = pipeline();
    let ticket = pipeline.submit(rows::scenario_two_points(), VisualizationMode::Density);
    let view = pipeline.prepare(&rows::scenario_two_points(), VisualizationMode::Density);

    pipeline.clear();
    assert!(pipeline.run_pending().is_none());
    assert!(!pipeline.apply(ticket, view));
}

// ============================================================================
// Cluster click
// ============================================================================

#[test]
fn test_cluster_click_frames_members() {
    let mut pipeline = pipeline();
    pipeline.update_now(rows::mortality_geographic(), VisualizationMode::Cluster);

    let clusters = pipeline
        .controller()
        .layer()
        .and_then(|l| l.as_cluster())
        .map(|c| c.clusters_at(8))
        .unwrap();
    let target = clusters.iter().max_by_key(|c| c.count).unwrap().clone();

    assert!(pipeline.controller_mut().on_cluster_click(&target));
    let (region, _) = pipeline.controller().host().last_fit().unwrap();
    assert_eq!(region, target.region);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = MapConfig::load(dir.path().join("missing.yaml")).unwrap();
    assert_eq!(config, MapConfig::default());
}

#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.yaml");
    std::fs::write(
        &path,
        "projection:\n  input_mode: geographic\nviewport:\n  fit_padding: 10\n",
    )
    .unwrap();

    let config = MapConfig::load(&path).unwrap();
    assert_eq!(config.projection.input_mode, InputMode::Geographic);

    let mut pipeline = MapPipeline::new(RecordingHost::default(), &config);
    // Projected telemetry rows are rejected when input is declared geographic
    pipeline.update_now(rows::telemetry_projected(), VisualizationMode::Cluster);
    assert_eq!(pipeline.controller().state(), ViewportState::Empty);

    pipeline.update_now(rows::scenario_two_points(), VisualizationMode::Cluster);
    assert_eq!(pipeline.controller().host().last_fit().unwrap().1, 10.0);
}

#[test]
fn test_controller_over_custom_host() {
    #[derive(Default)]
    struct CountingHost {
        added: usize,
        removed: usize,
        fits: usize,
    }

    impl MapHost for CountingHost {
        fn add_layer(&mut self, _layer: std::sync::Arc<layers::SpatialLayer>) -> viewport::LayerId {
            self.added += 1;
            viewport::LayerId(self.added as u64)
        }
        fn remove_layer(&mut self, _id: viewport::LayerId) {
            self.removed += 1;
        }
        fn fit_to_region(&mut self, _region: &map_common::BoundingRegion, _padding: f64) {
            self.fits += 1;
        }
    }

    let builder = layers::SpatialLayerBuilder::default();
    let mut controller = ViewportController::new(CountingHost::default());
    for _ in 0..4 {
        controller.show(builder.build(&[], VisualizationMode::Density), None);
    }
    controller.clear();

    let host = controller.into_host();
    assert_eq!((host.added, host.removed, host.fits), (4, 4, 0));
}
