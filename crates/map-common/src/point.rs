//! Raw query rows and their reprojected geographic form.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A row as returned by the query service.
///
/// Rows are opaque JSON objects; the pipeline only reads the fields named
/// by the [`FieldKeys`] lists below and carries everything else through.
pub type RawPoint = Map<String, Value>;

/// Mean Earth radius in kilometres (haversine).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ordered list of accepted keys for one logical field.
///
/// Upstream tables disagree on casing (`X` vs `x`, `VisitCount` vs
/// `visit_count`), so each logical field is looked up through an explicit
/// list. The first key holding a non-null value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl FieldKeys {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }

    /// Easting / longitude.
    pub const X: FieldKeys = FieldKeys::new("x", &["X", "x"]);

    /// Northing / latitude.
    pub const Y: FieldKeys = FieldKeys::new("y", &["Y", "y"]);

    /// Count-like attributes used as point intensity.
    pub const INTENSITY: FieldKeys = FieldKeys::new(
        "intensity",
        &["VisitCount", "visit_count", "CauseCount", "cause_count"],
    );

    /// Mortality cause label.
    pub const CAUSE: FieldKeys = FieldKeys::new("cause", &["Cause", "cause"]);

    /// Find the first non-null value among the accepted keys.
    pub fn resolve<'a>(&self, record: &'a RawPoint) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null())
    }

    /// Resolve the field and coerce it to a float.
    ///
    /// Numbers and numeric strings are accepted. A present value that does
    /// not coerce yields `None`; later keys are not consulted.
    pub fn resolve_f64(&self, record: &RawPoint) -> Option<f64> {
        self.resolve(record).and_then(value_as_f64)
    }

    /// Resolve the field as text. Numbers are rendered in JSON form.
    pub fn resolve_str(&self, record: &RawPoint) -> Option<String> {
        match self.resolve(record)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::String(_) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Coerce a JSON value to a float.
///
/// Strings are trimmed and parsed; `"NaN"` parses to NaN and is left for the
/// caller to reject.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A reprojected point.
///
/// `attributes` holds the untouched source row. When serialized, the row is
/// written first and `lat`, `lon` and `intensity` are written last, replacing
/// any source fields of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub intensity: f64,
    pub attributes: RawPoint,
}

impl GeoPoint {
    /// Keys written by the pipeline itself.
    pub const DERIVED_KEYS: [&'static str; 3] = ["lat", "lon", "intensity"];

    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            intensity: 1.0,
            attributes: RawPoint::new(),
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_attributes(mut self, attributes: RawPoint) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether both coordinates are finite numbers.
    pub fn has_position(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Mortality cause label, if the source row carried one.
    pub fn cause(&self) -> Option<String> {
        FieldKeys::CAUSE.resolve_str(&self.attributes)
    }

    /// Human-readable position, e.g. `26.2000°N, 81.5000°W`.
    ///
    /// Hemisphere letters are fixed; the display only serves the western
    /// northern quadrant the data lives in.
    pub fn format_location(&self, precision: usize) -> String {
        format!(
            "{:.*}°N, {:.*}°W",
            precision,
            self.lat,
            precision,
            self.lon.abs()
        )
    }

    /// Great-circle distance to another point in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let passthrough = self
            .attributes
            .iter()
            .filter(|(key, _)| !Self::DERIVED_KEYS.contains(&key.as_str()));

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in passthrough {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("lat", &self.lat)?;
        map.serialize_entry("lon", &self.lon)?;
        map.serialize_entry("intensity", &self.intensity)?;
        map.end()
    }
}

/// Haversine distance between two lat/lon pairs in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
