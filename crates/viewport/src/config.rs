//! Map configuration file.
//!
//! ```yaml
//! projection:
//!   source_crs: "EPSG:2236"
//!   input_mode: auto
//! heatmap:
//!   radius: 20
//!   blur: 20
//! cluster:
//!   max_cluster_radius: 80
//!   disable_clustering_at_zoom: 16
//! viewport:
//!   fit_padding: 50
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use layers::{ClusterConfig, HeatmapConfig, LayerConfig};
use projection::ProjectionConfig;

/// Camera defaults and framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Pixels kept free around a fitted region.
    pub fit_padding: f64,
    /// (lat, lon)
    pub center: (f64, f64),
    pub default_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Viewport size in pixels used when fitting.
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fit_padding: 50.0,
            center: (26.23, -81.59),
            default_zoom: 10,
            min_zoom: 8,
            max_zoom: 18,
            width: 1024,
            height: 768,
        }
    }
}

/// Everything the map pipeline can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub projection: ProjectionConfig,
    pub heatmap: HeatmapConfig,
    pub cluster: ClusterConfig,
    pub viewport: ViewportConfig,
}

impl MapConfig {
    /// Load from a YAML file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "Map config not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read map config {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse map config {}", path.display()))?;

        info!(
            path = %path.display(),
            source_crs = %config.projection.source_crs,
            "Loaded map config"
        );
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn layer_config(&self) -> LayerConfig {
        LayerConfig {
            heatmap: self.heatmap.clone(),
            cluster: self.cluster.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::{CrsCode, InputMode};

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.projection.source_crs, CrsCode::Epsg2236);
        assert_eq!(config.projection.input_mode, InputMode::Auto);
        assert_eq!(config.viewport.fit_padding, 50.0);
        assert_eq!(config.viewport.center, (26.23, -81.59));
        assert_eq!((config.viewport.min_zoom, config.viewport.max_zoom), (8, 18));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
projection:
  input_mode: projected
heatmap:
  radius: 30
viewport:
  fit_padding: 20
"#;
        let config = MapConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.projection.input_mode, InputMode::Projected);
        assert_eq!(config.heatmap.radius, 30.0);
        assert_eq!(config.heatmap.blur, 20.0);
        assert_eq!(config.viewport.fit_padding, 20.0);
        assert_eq!(config.cluster.max_cluster_radius, 80.0);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(MapConfig::from_yaml("  \n").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_bad_crs_is_an_error() {
        assert!(MapConfig::from_yaml("projection:\n  source_crs: EPSG:9999\n").is_err());
    }
}
