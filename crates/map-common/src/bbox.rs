//! Geographic bounding regions used to fit the map viewport.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Smallest axis-aligned lat/lon rectangle around a point set.
///
/// `center` is the midpoint of the box, not the centroid of the points, so
/// a single outlier pulls the center along with the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    /// (lat, lon)
    pub center: (f64, f64),
}

impl BoundingRegion {
    /// Create a region from its extremes. Swapped arguments are reordered.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        let (min_lat, max_lat) = (min_lat.min(max_lat), min_lat.max(max_lat));
        let (min_lon, max_lon) = (min_lon.min(max_lon), min_lon.max(max_lon));

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            center: ((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0),
        }
    }

    /// Degenerate region around a single position.
    pub fn from_point(lat: f64, lon: f64) -> Self {
        Self::new(lat, lat, lon, lon)
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Whether the region has no area.
    pub fn is_point(&self) -> bool {
        self.lat_span() == 0.0 && self.lon_span() == 0.0
    }

    /// Check if a position lies inside the region (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Smallest region covering both inputs.
    pub fn union(&self, other: &BoundingRegion) -> BoundingRegion {
        BoundingRegion::new(
            self.min_lat.min(other.min_lat),
            self.max_lat.max(other.max_lat),
            self.min_lon.min(other.min_lon),
            self.max_lon.max(other.max_lon),
        )
    }

    /// Leaflet-style `[[south, west], [north, east]]` corners.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }
}

/// Running min/max over a stream of positions.
///
/// Non-finite positions are skipped so that a malformed record cannot turn
/// the whole region into NaN.
#[derive(Debug, Clone, Copy)]
pub struct BoundsAccumulator {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    count: usize,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            count: 0,
        }
    }

    /// Add a position. Returns false if it was skipped.
    pub fn push(&mut self, lat: f64, lon: f64) -> bool {
        if !lat.is_finite() || !lon.is_finite() {
            return false;
        }

        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.count += 1;
        true
    }

    /// Number of positions accepted so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The accumulated region, or `None` if nothing was accepted.
    pub fn finish(&self) -> Option<BoundingRegion> {
        if self.count == 0 {
            return None;
        }

        Some(BoundingRegion {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
            center: (
                (self.min_lat + self.max_lat) / 2.0,
                (self.min_lon + self.max_lon) / 2.0,
            ),
        })
    }
}

/// Compute the bounding region of a point set in a single pass.
///
/// Returns `None` for an empty set (or one where no point has a usable
/// position); callers must leave the viewport alone in that case.
pub fn bounds<'a, I>(points: I) -> Option<BoundingRegion>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut acc = BoundsAccumulator::new();
    for point in points {
        acc.push(point.lat, point.lon);
    }
    acc.finish()
}
