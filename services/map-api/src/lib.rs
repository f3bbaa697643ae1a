//! Map API Service Library
//!
//! HTTP endpoints over the panther mortality and telemetry stored queries.
//! Spatial results are reprojected and returned as ready-to-draw map views.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use handlers::{health, preview, query};
use state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Query endpoints
        .route(
            "/api/mortality-query-1",
            post(query::mortality_query_1_handler).fallback(query::method_not_allowed_handler),
        )
        .route(
            "/api/mortality-query-2",
            post(query::mortality_query_2_handler).fallback(query::method_not_allowed_handler),
        )
        .route(
            "/api/telemetry-query-1",
            post(query::telemetry_query_1_handler).fallback(query::method_not_allowed_handler),
        )
        .route(
            "/api/telemetry-query-2",
            post(query::telemetry_query_2_handler).fallback(query::method_not_allowed_handler),
        )
        // Rendered heatmap
        .route(
            "/api/mortality-query-1/preview.png",
            post(preview::mortality_preview_handler).fallback(query::method_not_allowed_handler),
        )
        // Health and metrics
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
