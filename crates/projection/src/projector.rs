//! Single-point conversion from source coordinates to latitude/longitude.

use serde::{Deserialize, Serialize};
use tracing::trace;

use map_common::{CrsCode, InputMode, MapError, MapResult};

use crate::transverse_mercator::TransverseMercator;
use crate::validate::PointValidator;

/// Maximum forward/inverse disagreement, in projected units, before a
/// reprojected point is considered outside the projection's domain.
const ROUNDTRIP_TOLERANCE: f64 = 1.0;

/// Projection settings, usually the `projection:` section of the map config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// CRS of incoming projected coordinates.
    pub source_crs: CrsCode,
    /// How to decide between geographic passthrough and reprojection.
    pub input_mode: InputMode,
}

/// A converted position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPosition {
    pub lat: f64,
    pub lon: f64,
    /// True when the input was taken as already geographic.
    pub passthrough: bool,
}

/// Converts source coordinate pairs to geographic (lat, lon).
#[derive(Debug, Clone)]
pub struct CoordinateProjector {
    /// `None` when the source CRS is itself geographic.
    source: Option<TransverseMercator>,
    mode: InputMode,
}

impl Default for CoordinateProjector {
    fn default() -> Self {
        Self::florida_east()
    }
}

impl CoordinateProjector {
    pub fn new(source: TransverseMercator, mode: InputMode) -> Self {
        Self {
            source: Some(source),
            mode,
        }
    }

    /// Florida East source with the mixed-input heuristic.
    pub fn florida_east() -> Self {
        Self::new(TransverseMercator::florida_east(), InputMode::Auto)
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        match config.source_crs {
            CrsCode::Epsg2236 => Self::new(TransverseMercator::florida_east(), config.input_mode),
            CrsCode::Epsg4326 => Self {
                source: None,
                mode: InputMode::Geographic,
            },
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Convert `(x, y)` to `(lat, lon)`.
    ///
    /// Pairs with `|x| <= 180` and `|y| <= 90` are returned as `(y, x)`
    /// without touching the projection (in `Auto` and `Geographic` modes).
    /// Anything unusable yields `None`.
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.try_project(x, y).ok().map(|p| (p.lat, p.lon))
    }

    /// Like [`project`](Self::project) but says why a pair was rejected.
    pub fn try_project(&self, x: f64, y: f64) -> MapResult<ProjectedPosition> {
        if !x.is_finite() || !y.is_finite() {
            trace!(x, y, "Rejecting non-finite coordinate");
            return Err(MapError::InvalidCoordinate { x, y });
        }

        let geographic = PointValidator::in_geographic_range(x, y);

        match (self.mode, geographic) {
            (InputMode::Auto | InputMode::Geographic, true) => Ok(ProjectedPosition {
                lat: y,
                lon: x,
                passthrough: true,
            }),
            (InputMode::Geographic, false) => Err(MapError::InvalidCoordinate { x, y }),
            (InputMode::Auto | InputMode::Projected, _) => self.reproject(x, y),
        }
    }

    fn reproject(&self, x: f64, y: f64) -> MapResult<ProjectedPosition> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| MapError::ProjectionFailure("no projected source CRS".into()))?;

        let (lat, lon) = source.inverse(x, y);

        if !lat.is_finite() || !lon.is_finite() {
            trace!(x, y, "Inverse projection produced non-finite output");
            return Err(MapError::ProjectionFailure(format!(
                "non-finite result for ({}, {})",
                x, y
            )));
        }
        if !PointValidator::in_geographic_range(lon, lat) {
            trace!(x, y, lat, lon, "Inverse projection left geographic range");
            return Err(MapError::ProjectionFailure(format!(
                "({}, {}) maps outside geographic range",
                x, y
            )));
        }

        // Far outside the zone the series diverge and can land on
        // plausible-looking angles; a forward pass catches that.
        let (fx, fy) = source.forward(lat, lon);
        if (fx - x).abs() > ROUNDTRIP_TOLERANCE || (fy - y).abs() > ROUNDTRIP_TOLERANCE {
            trace!(x, y, fx, fy, "Inverse projection failed roundtrip check");
            return Err(MapError::ProjectionFailure(format!(
                "({}, {}) is outside the projection domain",
                x, y
            )));
        }

        Ok(ProjectedPosition {
            lat,
            lon,
            passthrough: false,
        })
    }

    /// Forward transform: geographic `(lat, lon)` to source `(x, y)`.
    ///
    /// Returns `None` when the source CRS is geographic or the inputs are
    /// not finite.
    pub fn unproject(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        let (x, y) = self.source.as_ref()?.forward(lat, lon);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}
