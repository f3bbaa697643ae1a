//! Lifecycle of the single layer attached to the map.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use layers::{Cluster, SpatialLayer};
use map_common::BoundingRegion;

use crate::host::{LayerId, MapHost};

/// Default padding around a fitted region, in pixels.
pub const DEFAULT_FIT_PADDING: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportState {
    Empty,
    Populated,
}

/// Keeps at most one layer attached to a [`MapHost`].
///
/// Every replacement removes the old layer before the new one is added.
#[derive(Debug)]
pub struct ViewportController<H: MapHost> {
    host: H,
    padding: f64,
    attached: Option<(LayerId, Arc<SpatialLayer>)>,
}

impl<H: MapHost> ViewportController<H> {
    pub fn new(host: H) -> Self {
        Self::with_padding(host, DEFAULT_FIT_PADDING)
    }

    pub fn with_padding(host: H, padding: f64) -> Self {
        Self {
            host,
            padding,
            attached: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        match self.attached {
            Some(_) => ViewportState::Populated,
            None => ViewportState::Empty,
        }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn layer(&self) -> Option<&Arc<SpatialLayer>> {
        self.attached.as_ref().map(|(_, layer)| layer)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Replace whatever is shown with `layer`, framing `region` if given.
    pub fn show(&mut self, layer: SpatialLayer, region: Option<BoundingRegion>) {
        self.detach();

        let layer = Arc::new(layer);
        let id = self.host.add_layer(Arc::clone(&layer));
        debug!(
            id = id.0,
            mode = layer.mode().as_str(),
            items = layer.len(),
            "Attached layer"
        );
        self.attached = Some((id, layer));

        if let Some(region) = region {
            self.host.fit_to_region(&region, self.padding);
        }
    }

    /// Detach the current layer and return to `Empty`.
    pub fn clear(&mut self) {
        if self.detach() {
            info!("Viewport cleared");
        }
    }

    /// Frame a clicked cluster's members.
    ///
    /// Returns false when no cluster layer is attached or click-to-zoom is
    /// disabled.
    pub fn on_cluster_click(&mut self, cluster: &Cluster) -> bool {
        let target = self
            .layer()
            .and_then(|layer| layer.as_cluster())
            .and_then(|layer| layer.click_target(cluster));

        match target {
            Some(region) => {
                self.host.fit_to_region(&region, self.padding);
                true
            }
            None => false,
        }
    }

    fn detach(&mut self) -> bool {
        match self.attached.take() {
            Some((id, _)) => {
                self.host.remove_layer(id);
                debug!(id = id.0, "Detached layer");
                true
            }
            None => false,
        }
    }
}
