//! Map layer construction for reprojected point sets.
//!
//! Two visualization strategies:
//! - Density surface (heatmap) with a weighted sample per point
//! - Cluster layer with one marker per point, grouped by screen proximity

pub mod builder;
pub mod cluster;
pub mod config;
pub mod heatmap;
pub mod marker;
pub mod png;

pub use builder::{SpatialLayer, SpatialLayerBuilder, VisualizationMode};
pub use cluster::{Cluster, ClusterLayer};
pub use config::{ClusterConfig, HeatmapConfig, LayerConfig, MarkerStyle};
pub use heatmap::{DensitySurface, Raster, WeightedPoint};
pub use marker::Marker;
