//! Builds a map layer from reprojected points and a visualization mode.

use serde::{Deserialize, Serialize};
use tracing::debug;

use map_common::{BoundingRegion, GeoPoint, MapError};

use crate::cluster::ClusterLayer;
use crate::config::LayerConfig;
use crate::heatmap::DensitySurface;
use crate::marker::Marker;

/// How a point set is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    /// Continuous density surface.
    #[default]
    #[serde(alias = "heatmap")]
    Density,
    /// Discrete markers grouped by proximity.
    Cluster,
}

impl VisualizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationMode::Density => "density",
            VisualizationMode::Cluster => "cluster",
        }
    }
}

impl std::str::FromStr for VisualizationMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "density" | "heatmap" => Ok(VisualizationMode::Density),
            "cluster" => Ok(VisualizationMode::Cluster),
            other => Err(MapError::InvalidParameter {
                param: "mode".to_string(),
                message: format!("unknown visualization mode '{}'", other),
            }),
        }
    }
}

/// A renderable layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpatialLayer {
    DensitySurface(DensitySurface),
    ClusterLayer(ClusterLayer),
}

impl SpatialLayer {
    pub fn mode(&self) -> VisualizationMode {
        match self {
            SpatialLayer::DensitySurface(_) => VisualizationMode::Density,
            SpatialLayer::ClusterLayer(_) => VisualizationMode::Cluster,
        }
    }

    /// Number of samples or markers.
    pub fn len(&self) -> usize {
        match self {
            SpatialLayer::DensitySurface(s) => s.len(),
            SpatialLayer::ClusterLayer(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn region(&self) -> Option<BoundingRegion> {
        match self {
            SpatialLayer::DensitySurface(s) => s.region(),
            SpatialLayer::ClusterLayer(c) => c.region(),
        }
    }

    pub fn as_density(&self) -> Option<&DensitySurface> {
        match self {
            SpatialLayer::DensitySurface(s) => Some(s),
            SpatialLayer::ClusterLayer(_) => None,
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterLayer> {
        match self {
            SpatialLayer::ClusterLayer(c) => Some(c),
            SpatialLayer::DensitySurface(_) => None,
        }
    }
}

/// Stateless layer factory holding only layer settings.
#[derive(Debug, Clone, Default)]
pub struct SpatialLayerBuilder {
    config: LayerConfig,
}

impl SpatialLayerBuilder {
    pub fn new(config: LayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn build(&self, points: &[GeoPoint], mode: VisualizationMode) -> SpatialLayer {
        let layer = match mode {
            VisualizationMode::Density => {
                SpatialLayer::DensitySurface(DensitySurface::from_points(points, &self.config.heatmap))
            }
            VisualizationMode::Cluster => {
                let markers = points.iter().map(Marker::from_point).collect();
                SpatialLayer::ClusterLayer(ClusterLayer::new(markers, &self.config.cluster))
            }
        };

        debug!(mode = mode.as_str(), points = points.len(), "Built spatial layer");
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("heatmap".parse::<VisualizationMode>().unwrap(), VisualizationMode::Density);
        assert_eq!("Cluster".parse::<VisualizationMode>().unwrap(), VisualizationMode::Cluster);
        assert!("scatter".parse::<VisualizationMode>().is_err());
    }

    #[test]
    fn test_mode_serde() {
        let mode: VisualizationMode = serde_json::from_str("\"heatmap\"").unwrap();
        assert_eq!(mode, VisualizationMode::Density);
        assert_eq!(serde_json::to_string(&VisualizationMode::Cluster).unwrap(), "\"cluster\"");
    }

    #[test]
    fn test_layer_reports_mode() {
        let builder = SpatialLayerBuilder::default();
        for mode in [VisualizationMode::Density, VisualizationMode::Cluster] {
            assert_eq!(builder.build(&[], mode).mode(), mode);
        }
    }
}
