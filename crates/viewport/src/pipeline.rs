//! From raw query rows to an attached layer.

use serde::Serialize;
use tracing::{debug, instrument};

use layers::{SpatialLayer, SpatialLayerBuilder, VisualizationMode};
use map_common::{bounds, BoundingRegion, RawPoint};
use projection::{BatchReprojector, CoordinateProjector, ReprojectStats};

use crate::config::MapConfig;
use crate::controller::ViewportController;
use crate::host::MapHost;
use crate::queue::{DeferredQueue, Ticket};

/// A fully computed view, ready to attach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedView {
    pub layer: SpatialLayer,
    pub region: Option<BoundingRegion>,
    pub stats: ReprojectStats,
}

/// Reproject `rows`, compute their bounds and build the layer for `mode`.
#[instrument(skip_all, fields(rows = rows.len(), mode = mode.as_str()))]
pub fn prepare_view(
    rows: &[RawPoint],
    mode: VisualizationMode,
    reprojector: &BatchReprojector,
    builder: &SpatialLayerBuilder,
) -> PreparedView {
    let (points, stats) = reprojector.reproject_with_stats(rows);
    let region = bounds(&points);
    let layer = builder.build(&points, mode);

    debug!(
        kept = stats.kept(),
        dropped = stats.dropped,
        has_region = region.is_some(),
        "Prepared view"
    );

    PreparedView {
        layer,
        region,
        stats,
    }
}

#[derive(Debug)]
struct Request {
    rows: Vec<RawPoint>,
    mode: VisualizationMode,
}

/// Deferred reprojection in front of a [`ViewportController`].
///
/// `submit` only queues; `run_pending` does the work, typically when the
/// host is idle. A result is attached only if no newer submission arrived
/// in the meantime.
#[derive(Debug)]
pub struct MapPipeline<H: MapHost> {
    reprojector: BatchReprojector,
    builder: SpatialLayerBuilder,
    queue: DeferredQueue<Request>,
    controller: ViewportController<H>,
}

impl<H: MapHost> MapPipeline<H> {
    pub fn new(host: H, config: &MapConfig) -> Self {
        Self {
            reprojector: BatchReprojector::new(CoordinateProjector::from_config(&config.projection)),
            builder: SpatialLayerBuilder::new(config.layer_config()),
            queue: DeferredQueue::new(),
            controller: ViewportController::with_padding(host, config.viewport.fit_padding),
        }
    }

    pub fn controller(&self) -> &ViewportController<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController<H> {
        &mut self.controller
    }

    pub fn into_controller(self) -> ViewportController<H> {
        self.controller
    }

    /// Queue a new data set, superseding anything not yet processed.
    pub fn submit(&mut self, rows: Vec<RawPoint>, mode: VisualizationMode) -> Ticket {
        self.queue.submit(Request { rows, mode })
    }

    /// Process the pending submission, if any.
    ///
    /// Returns the ticket that was applied.
    pub fn run_pending(&mut self) -> Option<Ticket> {
        let (ticket, request) = self.queue.pop_next()?;
        let view = self.prepare(&request.rows, request.mode);
        self.apply(ticket, view).then_some(ticket)
    }

    /// Compute a view without touching the viewport.
    pub fn prepare(&self, rows: &[RawPoint], mode: VisualizationMode) -> PreparedView {
        prepare_view(rows, mode, &self.reprojector, &self.builder)
    }

    /// Attach `view` if `ticket` is still the latest submission.
    ///
    /// An empty view clears the viewport instead.
    pub fn apply(&mut self, ticket: Ticket, view: PreparedView) -> bool {
        if !self.queue.is_current(ticket) {
            debug!(ticket = ticket.0, "Discarding stale view");
            return false;
        }

        if view.layer.is_empty() {
            self.controller.clear();
        } else {
            self.controller.show(view.layer, view.region);
        }
        true
    }

    /// Submit and process immediately.
    pub fn update_now(&mut self, rows: Vec<RawPoint>, mode: VisualizationMode) -> Ticket {
        let ticket = self.submit(rows, mode);
        self.run_pending();
        ticket
    }

    /// Drop pending work and detach the layer.
    pub fn clear(&mut self) {
        self.queue.reset();
        self.controller.clear();
    }
}
