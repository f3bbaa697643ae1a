//! The rendering host the viewport drives.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use layers::SpatialLayer;
use map_common::BoundingRegion;
use projection::mercator::lat_lon_to_pixel;

use crate::config::ViewportConfig;

/// Handle for an attached layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u64);

/// Operations a live map exposes to the viewport.
pub trait MapHost {
    fn add_layer(&mut self, layer: Arc<SpatialLayer>) -> LayerId;

    fn remove_layer(&mut self, id: LayerId);

    /// Move the camera so `region` fits with `padding` pixels to spare.
    fn fit_to_region(&mut self, region: &BoundingRegion, padding: f64);
}

/// Map camera: center and integer zoom over a fixed-size viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    pub fn from_config(config: &ViewportConfig) -> Self {
        let min_zoom = config.min_zoom.min(config.max_zoom);
        Self {
            center: config.center,
            zoom: config.default_zoom.clamp(min_zoom, config.max_zoom),
            min_zoom,
            max_zoom: config.max_zoom,
            width: config.width,
            height: config.height,
        }
    }

    /// Highest zoom at which `region` fits inside the padded viewport.
    ///
    /// Never below `min_zoom`, so a region wider than the map still gets
    /// the widest view available.
    pub fn zoom_to_fit(&self, region: &BoundingRegion, padding: f64) -> u8 {
        let avail_w = (self.width as f64 - 2.0 * padding).max(1.0);
        let avail_h = (self.height as f64 - 2.0 * padding).max(1.0);

        let mut best = self.min_zoom;
        for zoom in self.min_zoom..=self.max_zoom {
            let z = zoom as f64;
            let (x0, y0) = lat_lon_to_pixel(region.max_lat, region.min_lon, z);
            let (x1, y1) = lat_lon_to_pixel(region.min_lat, region.max_lon, z);

            if (x1 - x0).abs() <= avail_w && (y1 - y0).abs() <= avail_h {
                best = zoom;
            } else {
                break;
            }
        }
        best
    }

    pub fn fit(&mut self, region: &BoundingRegion, padding: f64) {
        self.center = region.center;
        self.zoom = self.zoom_to_fit(region, padding);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

/// What happened on a [`RecordingHost`], in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Added { id: LayerId },
    Removed { id: LayerId },
    Fitted { region: BoundingRegion, padding: f64 },
}

/// In-memory host that keeps attached layers, the camera and an event log.
///
/// Serves as the headless map behind the HTTP service and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    next_id: u64,
    layers: Vec<(LayerId, Arc<SpatialLayer>)>,
    camera: Camera,
    events: Vec<HostEvent>,
    last_fit: Option<(BoundingRegion, f64)>,
}

impl RecordingHost {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn layers(&self) -> impl Iterator<Item = &Arc<SpatialLayer>> {
        self.layers.iter().map(|(_, layer)| layer)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Region and padding of the most recent fit.
    pub fn last_fit(&self) -> Option<(BoundingRegion, f64)> {
        self.last_fit
    }
}

impl MapHost for RecordingHost {
    fn add_layer(&mut self, layer: Arc<SpatialLayer>) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push((id, layer));
        self.events.push(HostEvent::Added { id });
        trace!(id = id.0, "Layer added");
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        let before = self.layers.len();
        self.layers.retain(|(existing, _)| *existing != id);
        if self.layers.len() != before {
            self.events.push(HostEvent::Removed { id });
            trace!(id = id.0, "Layer removed");
        }
    }

    fn fit_to_region(&mut self, region: &BoundingRegion, padding: f64) {
        self.camera.fit(region, padding);
        self.last_fit = Some((*region, padding));
        self.events.push(HostEvent::Fitted {
            region: *region,
            padding,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers::{SpatialLayerBuilder, VisualizationMode};

    fn empty_layer() -> Arc<SpatialLayer> {
        Arc::new(SpatialLayerBuilder::default().build(&[], VisualizationMode::Density))
    }

    #[test]
    fn test_add_remove() {
        let mut host = RecordingHost::default();
        let a = host.add_layer(empty_layer());
        let b = host.add_layer(empty_layer());
        assert_ne!(a, b);
        assert_eq!(host.layer_count(), 2);

        host.remove_layer(a);
        host.remove_layer(a);
        assert_eq!(host.layer_count(), 1);
        assert_eq!(
            host.events(),
            &[
                HostEvent::Added { id: a },
                HostEvent::Added { id: b },
                HostEvent::Removed { id: a },
            ]
        );
    }

    #[test]
    fn test_zoom_to_fit_southwest_florida() {
        let camera = Camera::default();
        let region = BoundingRegion::new(25.5, 27.0, -82.2, -80.8);
        // 510 x 609 px at zoom 9 fits in 924 x 668; zoom 10 doubles that
        assert_eq!(camera.zoom_to_fit(&region, 50.0), 9);
    }

    #[test]
    fn test_point_region_zooms_all_the_way() {
        let camera = Camera::default();
        let region = BoundingRegion::from_point(26.2, -81.5);
        assert_eq!(camera.zoom_to_fit(&region, 50.0), 18);
    }

    #[test]
    fn test_fit_moves_center() {
        let mut host = RecordingHost::default();
        let region = BoundingRegion::new(26.2, 26.5, -82.0, -81.5);
        host.fit_to_region(&region, 50.0);

        assert_eq!(host.camera().center, (26.35, -81.75));
        assert_eq!(host.last_fit(), Some((region, 50.0)));
    }
}
