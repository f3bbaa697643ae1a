//! Viewport management for the live map.
//!
//! Owns the single attached layer, frames the camera around new data and
//! defers heavy batch work with last-write-wins semantics.

pub mod config;
pub mod controller;
pub mod host;
pub mod pipeline;
pub mod queue;

pub use config::{MapConfig, ViewportConfig};
pub use controller::{ViewportController, ViewportState};
pub use host::{Camera, HostEvent, LayerId, MapHost, RecordingHost};
pub use pipeline::{prepare_view, MapPipeline, PreparedView};
pub use queue::{DeferredQueue, Ticket};
