//! Error types for the map pipeline.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for map pipeline operations.
///
/// Point-level variants never escape batch processing; they exist so the
/// single-point APIs can say why a coordinate was rejected.
#[derive(Debug, Error)]
pub enum MapError {
    // === Point Errors ===
    #[error("Invalid coordinate: x={x}, y={y}")]
    InvalidCoordinate { x: f64, y: f64 },

    #[error("Missing coordinate field: {0}")]
    MissingCoordinate(&'static str),

    #[error("Projection error: {0}")]
    ProjectionFailure(String),

    // === Configuration Errors ===
    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),
}

impl MapError {
    /// Whether this error only affects a single record.
    ///
    /// Record-level errors are absorbed by dropping the record.
    pub fn is_point_level(&self) -> bool {
        matches!(
            self,
            MapError::InvalidCoordinate { .. }
                | MapError::MissingCoordinate(_)
                | MapError::ProjectionFailure(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MapError::InvalidCoordinate { .. }
            | MapError::MissingCoordinate(_)
            | MapError::InvalidCrs(_)
            | MapError::InvalidColor(_)
            | MapError::InvalidParameter { .. } => 400,

            _ => 500,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Config(format!("JSON error: {}", err))
    }
}
