//! The four stored-query endpoints.
//!
//! Spatial queries answer with a [`MapView`]: the rows are reprojected,
//! turned into a layer and attached to a headless viewport, and the
//! resulting layer and camera are returned. Chart queries pass rows through.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use layers::{SpatialLayer, VisualizationMode};
use map_common::{BoundingRegion, RawPoint};
use projection::ReprojectStats;
use query_client::{
    MortalityCauseFilters, MortalityHeatmapFilters, QueryResult, RpcFilters,
    TelemetryLocationFilters, TelemetryTimelineFilters,
};
use viewport::{prepare_view, Camera};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// What the viewport shows after a spatial query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub mode: VisualizationMode,
    /// Rows returned by the database, before reprojection.
    pub count: usize,
    pub stats: ReprojectStats,
    /// `None` when no row could be placed.
    pub layer: Option<SpatialLayer>,
    pub region: Option<BoundingRegion>,
    pub padding: Option<f64>,
    pub camera: Camera,
}

/// Run `rows` through the pipeline into a fresh viewport.
pub fn map_view(state: &AppState, rows: &[RawPoint], mode: VisualizationMode) -> MapView {
    let view = prepare_view(rows, mode, &state.reprojector, &state.builder);
    let stats = view.stats;

    let mut viewport = state.viewport();
    if view.layer.is_empty() {
        viewport.clear();
    } else {
        viewport.show(view.layer, view.region);
    }

    let layer = viewport.layer().map(|layer| SpatialLayer::clone(layer));
    let host = viewport.into_host();
    let fit = host.last_fit();

    MapView {
        mode,
        count: rows.len(),
        stats,
        layer,
        region: fit.map(|(region, _)| region),
        padding: fit.map(|(_, padding)| padding),
        camera: *host.camera(),
    }
}

/// Parse a request body into filter parameters.
///
/// An empty body is an empty parameter set, so the missing-parameter
/// message names what is required.
pub fn parse_params(body: &[u8]) -> ApiResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

/// Await a database call, recording its duration and outcome.
pub(crate) async fn timed_query<F>(endpoint: &'static str, query: F) -> ApiResult<Vec<RawPoint>>
where
    F: Future<Output = QueryResult<Vec<RawPoint>>>,
{
    let start = Instant::now();
    let result = query.await;
    metrics::record_query_duration(endpoint, start.elapsed());

    match result {
        Ok(rows) => {
            metrics::record_rows(endpoint, rows.len());
            debug!(endpoint, rows = rows.len(), "Query returned");
            Ok(rows)
        }
        Err(err) => {
            metrics::record_query_error(endpoint);
            Err(err.into())
        }
    }
}

fn spatial_response(
    state: &AppState,
    endpoint: &'static str,
    rows: &[RawPoint],
    mode: VisualizationMode,
) -> Json<MapView> {
    let view = map_view(state, rows, mode);
    metrics::record_dropped_points(endpoint, view.stats.dropped);
    Json(view)
}

/// POST /api/mortality-query-1 - mortality locations as a density map
#[instrument(skip_all, name = "mortality_query_1")]
pub async fn mortality_query_1_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MapView>> {
    const ENDPOINT: &str = "mortality-query-1";
    metrics::record_request(ENDPOINT);

    let filters = MortalityHeatmapFilters::from_params(&parse_params(&body)?)?;
    let rows = timed_query(ENDPOINT, state.query.mortality_heatmap(&filters)).await?;

    Ok(spatial_response(&state, ENDPOINT, &rows, VisualizationMode::Density))
}

/// POST /api/mortality-query-2 - deaths per cause
#[instrument(skip_all, name = "mortality_query_2")]
pub async fn mortality_query_2_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Vec<RawPoint>>> {
    const ENDPOINT: &str = "mortality-query-2";
    metrics::record_request(ENDPOINT);

    let filters = MortalityCauseFilters::from_params(&parse_params(&body)?)?;
    let rows = timed_query(ENDPOINT, state.query.mortality_causes(&filters)).await?;

    Ok(Json(rows))
}

/// POST /api/telemetry-query-1 - most visited locations as clustered markers
#[instrument(skip_all, name = "telemetry_query_1")]
pub async fn telemetry_query_1_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MapView>> {
    const ENDPOINT: &str = "telemetry-query-1";
    metrics::record_request(ENDPOINT);

    let filters = TelemetryLocationFilters::from_params(&parse_params(&body)?)?;
    let rows = timed_query(ENDPOINT, state.query.telemetry_locations(&filters)).await?;

    Ok(spatial_response(&state, ENDPOINT, &rows, VisualizationMode::Cluster))
}

/// POST /api/telemetry-query-2 - observations per year
#[instrument(skip_all, name = "telemetry_query_2")]
pub async fn telemetry_query_2_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Vec<RawPoint>>> {
    const ENDPOINT: &str = "telemetry-query-2";
    metrics::record_request(ENDPOINT);

    let filters = TelemetryTimelineFilters::from_params(&parse_params(&body)?)?;
    let rows = timed_query(ENDPOINT, state.query.telemetry_timeline(&filters)).await?;

    Ok(Json(rows))
}

/// Any other method on a query route.
pub async fn method_not_allowed_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params_empty_body() {
        assert!(parse_params(b"").unwrap().is_empty());
        assert!(parse_params(b"  \n").unwrap().is_empty());
        assert!(parse_params(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_params_object() {
        let params = parse_params(br#"{"sex1": "M"}"#).unwrap();
        assert_eq!(params["sex1"], json!("M"));
    }

    #[test]
    fn test_parse_params_rejects_non_objects() {
        assert!(matches!(parse_params(b"[1, 2]"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_params(b"{\"sex1\":"), Err(ApiError::InvalidBody(_))));
    }
}
