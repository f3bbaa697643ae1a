//! Coordinate Reference System codes and input interpretation modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MapError;

/// CRS codes understood by the pipeline.
///
/// Exactly one projected source system is supported; everything is
/// reprojected to geographic WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lat/lon in degrees)
    Epsg4326,
    /// NAD83 / Florida East, transverse Mercator in US survey feet
    Epsg2236,
}

impl CrsCode {
    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:2236"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    pub fn parse(s: &str) -> Result<Self, MapError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" | "WGS84" => Ok(CrsCode::Epsg4326),
            "EPSG:2236" => Ok(CrsCode::Epsg2236),
            _ => Err(MapError::InvalidCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl Default for CrsCode {
    fn default() -> Self {
        CrsCode::Epsg2236
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg2236 => "EPSG:2236",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for CrsCode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrsCode::parse(s)
    }
}

impl TryFrom<String> for CrsCode {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CrsCode::parse(&value)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.to_string()
    }
}

/// How incoming coordinate pairs are interpreted.
///
/// `Auto` treats any pair with `|x| <= 180` and `|y| <= 90` as already
/// geographic and reprojects everything else. Projected coordinates that
/// happen to land inside that numeric window (a small patch near the false
/// origin) are misread under `Auto`; use `Projected` when the source is
/// known to be uniformly projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Auto,
    Geographic,
    Projected,
}
