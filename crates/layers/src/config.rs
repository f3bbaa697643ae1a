//! Layer configuration, the `heatmap:` and `cluster:` sections of the map config.

use serde::{Deserialize, Serialize};

use map_common::{Color, Gradient};

/// Density surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Kernel radius in screen pixels.
    pub radius: f64,
    /// Width of the soft edge around the kernel, in pixels.
    pub blur: f64,
    /// Zoom at which points reach full intensity.
    pub max_zoom: u8,
    /// Opacity floor for any pixel with non-zero density.
    pub min_opacity: f32,
    pub gradient: Gradient,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            blur: 20.0,
            max_zoom: 18,
            min_opacity: 0.3,
            gradient: Gradient::heatmap(),
        }
    }
}

/// Circle marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Radius in pixels.
    pub radius: f64,
    pub fill: Color,
    pub fill_opacity: f32,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 6.0,
            fill: Color::rgb(0xFF, 0xD7, 0x00),
            fill_opacity: 0.7,
            stroke: Color::rgb(0xFF, 0xFF, 0xFF),
            stroke_width: 1.0,
        }
    }
}

/// Cluster layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Markers closer than this many pixels merge into one cluster.
    pub max_cluster_radius: f64,
    /// At or past this zoom every marker is shown on its own.
    pub disable_clustering_at_zoom: u8,
    /// Clicking a cluster frames the cluster's members.
    pub zoom_to_bounds_on_click: bool,
    pub marker: MarkerStyle,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_cluster_radius: 80.0,
            disable_clustering_at_zoom: 16,
            zoom_to_bounds_on_click: true,
            marker: MarkerStyle::default(),
        }
    }
}

/// Both layer sections together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub heatmap: HeatmapConfig,
    pub cluster: ClusterConfig,
}
