//! Server-side heatmap rendering.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use layers::DensitySurface;
use map_common::{bounds, BoundingRegion, MapError};
use query_client::{MortalityHeatmapFilters, RpcFilters};

use crate::error::ApiResult;
use crate::handlers::query::{parse_params, timed_query};
use crate::metrics;
use crate::state::AppState;

pub const DEFAULT_PREVIEW_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PreviewSize {
    #[serde(default = "default_size")]
    pub width: usize,
    #[serde(default = "default_size")]
    pub height: usize,
}

fn default_size() -> usize {
    DEFAULT_PREVIEW_SIZE
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREVIEW_SIZE,
            height: DEFAULT_PREVIEW_SIZE,
        }
    }
}

/// POST /api/mortality-query-1/preview.png - the density surface as a PNG
///
/// The image covers the bounds of the placed points, or the configured map
/// center when there are none.
#[instrument(skip_all, name = "mortality_preview", fields(width = size.width, height = size.height))]
pub async fn mortality_preview_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(size): Query<PreviewSize>,
    body: Bytes,
) -> ApiResult<Response> {
    const ENDPOINT: &str = "mortality-preview";
    metrics::record_request(ENDPOINT);

    let filters = MortalityHeatmapFilters::from_params(&parse_params(&body)?)?;
    let rows = timed_query(ENDPOINT, state.query.mortality_heatmap(&filters)).await?;

    let (points, stats) = state.reprojector.reproject_with_stats(&rows);
    metrics::record_dropped_points(ENDPOINT, stats.dropped);

    let region = bounds(&points).unwrap_or_else(|| {
        let (lat, lon) = state.config.viewport.center;
        BoundingRegion::from_point(lat, lon)
    });
    let surface = DensitySurface::from_points(&points, &state.config.heatmap);

    let png = tokio::task::spawn_blocking(move || surface.render_png(&region, size.width, size.height))
        .await
        .map_err(|e| MapError::RenderError(e.to_string()))??;

    debug!(bytes = png.len(), samples = points.len(), "Rendered preview");

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
