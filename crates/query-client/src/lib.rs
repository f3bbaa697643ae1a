//! Access to the hosted tracking and mortality database.
//!
//! Queries are stored procedures called over HTTP. The [`QueryService`]
//! trait is the seam: handlers receive an explicitly constructed service
//! and tests substitute their own.

pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod service;

pub use client::RpcQueryClient;
pub use config::QueryClientConfig;
pub use error::{QueryError, QueryResult};
pub use filters::{
    AgeRange, MortalityCauseFilters, MortalityHeatmapFilters, RpcFilters, TelemetryLocationFilters,
    TelemetryTimelineFilters, YearRange,
};
pub use service::QueryService;
