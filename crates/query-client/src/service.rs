//! The query service seam.

use async_trait::async_trait;
use serde_json::Value;

use map_common::RawPoint;

use crate::error::QueryResult;
use crate::filters::{
    MortalityCauseFilters, MortalityHeatmapFilters, RpcFilters, TelemetryLocationFilters,
    TelemetryTimelineFilters,
};

/// Anything that can run the stored queries.
///
/// Implementors provide [`rpc`](QueryService::rpc); the typed query methods
/// are built on it.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Call a stored procedure and return its rows.
    async fn rpc(&self, function: &'static str, args: Value) -> QueryResult<Vec<RawPoint>>;

    /// Mortality locations for the density map.
    async fn mortality_heatmap(
        &self,
        filters: &MortalityHeatmapFilters,
    ) -> QueryResult<Vec<RawPoint>> {
        self.rpc(MortalityHeatmapFilters::FUNCTION, filters.rpc_args()?)
            .await
    }

    /// Cause counts for the bar chart.
    async fn mortality_causes(&self, filters: &MortalityCauseFilters) -> QueryResult<Vec<RawPoint>> {
        self.rpc(MortalityCauseFilters::FUNCTION, filters.rpc_args()?)
            .await
    }

    /// Most visited locations for the cluster map.
    async fn telemetry_locations(
        &self,
        filters: &TelemetryLocationFilters,
    ) -> QueryResult<Vec<RawPoint>> {
        self.rpc(TelemetryLocationFilters::FUNCTION, filters.rpc_args()?)
            .await
    }

    /// Observation counts per year for the line chart.
    async fn telemetry_timeline(
        &self,
        filters: &TelemetryTimelineFilters,
    ) -> QueryResult<Vec<RawPoint>> {
        self.rpc(TelemetryTimelineFilters::FUNCTION, filters.rpc_args()?)
            .await
    }
}
