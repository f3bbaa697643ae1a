//! Discrete location markers and their popup captions.

use serde::Serialize;

use map_common::{GeoPoint, RawPoint};

/// Decimal places shown in marker captions.
pub const CAPTION_PRECISION: usize = 4;

/// One circle marker per reprojected point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub intensity: f64,
    pub caption: String,
    pub attributes: RawPoint,
}

impl Marker {
    pub fn from_point(point: &GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            intensity: point.intensity,
            caption: caption(point),
            attributes: point.attributes.clone(),
        }
    }
}

/// Popup text for a point.
///
/// Always the location; then the count when it is above one, then the
/// cause label when the row carries one. Lines are separated by `\n`.
pub fn caption(point: &GeoPoint) -> String {
    let mut lines = vec![format!(
        "Location: {}",
        point.format_location(CAPTION_PRECISION)
    )];

    if point.intensity > 1.0 {
        lines.push(format!("Count: {}", point.intensity));
    }
    if let Some(cause) = point.cause().filter(|c| !c.is_empty()) {
        lines.push(format!("Cause: {}", cause));
    }

    lines.join("\n")
}
