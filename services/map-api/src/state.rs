//! Application state for the map API.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use layers::SpatialLayerBuilder;
use projection::{BatchReprojector, CoordinateProjector};
use query_client::{QueryClientConfig, QueryService, RpcQueryClient};
use viewport::{Camera, MapConfig, RecordingHost, ViewportController};

/// Shared application state.
pub struct AppState {
    /// Stored-procedure access; tests substitute their own.
    pub query: Arc<dyn QueryService>,

    pub config: MapConfig,

    pub reprojector: BatchReprojector,

    pub builder: SpatialLayerBuilder,

    /// Present when the process installed the Prometheus recorder.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(query: Arc<dyn QueryService>, config: MapConfig) -> Self {
        Self {
            reprojector: BatchReprojector::new(CoordinateProjector::from_config(&config.projection)),
            builder: SpatialLayerBuilder::new(config.layer_config()),
            query,
            config,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Build the state from the environment and a map config file.
    pub fn from_env(config_path: &Path) -> Result<Self> {
        let config = MapConfig::load(config_path)?;

        let client_config =
            QueryClientConfig::from_env().context("Failed to read database settings")?;
        info!(base_url = %client_config.base_url, "Using query service");
        let client = RpcQueryClient::new(client_config).context("Failed to build query client")?;

        Ok(Self::new(Arc::new(client), config))
    }

    /// A fresh headless viewport for one request.
    pub fn viewport(&self) -> ViewportController<RecordingHost> {
        let host = RecordingHost::new(Camera::from_config(&self.config.viewport));
        ViewportController::with_padding(host, self.config.viewport.fit_padding)
    }
}
