//! Reprojection of whole query result sets.

use serde::Serialize;
use tracing::{debug, trace};

use map_common::{FieldKeys, GeoPoint, RawPoint};

use crate::projector::CoordinateProjector;
use crate::validate::PointValidator;

/// Counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReprojectStats {
    pub input: usize,
    /// Already geographic, passed through.
    pub passthrough: usize,
    /// Inverse-projected from the source CRS.
    pub reprojected: usize,
    /// Missing, corrupt or unprojectable.
    pub dropped: usize,
}

impl ReprojectStats {
    pub fn kept(&self) -> usize {
        self.passthrough + self.reprojected
    }
}

/// Applies a [`CoordinateProjector`] to every record of a result set.
///
/// Records that cannot be placed are dropped; nothing here fails the batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReprojector {
    projector: CoordinateProjector,
}

impl BatchReprojector {
    pub fn new(projector: CoordinateProjector) -> Self {
        Self { projector }
    }

    pub fn projector(&self) -> &CoordinateProjector {
        &self.projector
    }

    /// Reproject every record, keeping input order and dropping failures.
    pub fn reproject_all(&self, points: &[RawPoint]) -> Vec<GeoPoint> {
        self.reproject_with_stats(points).0
    }

    /// [`reproject_all`](Self::reproject_all) plus per-batch counters.
    pub fn reproject_with_stats(&self, points: &[RawPoint]) -> (Vec<GeoPoint>, ReprojectStats) {
        let mut stats = ReprojectStats {
            input: points.len(),
            ..Default::default()
        };
        let mut out = Vec::with_capacity(points.len());

        for (index, record) in points.iter().enumerate() {
            match self.locate(record) {
                Some((lat, lon, passthrough)) => {
                    if passthrough {
                        stats.passthrough += 1;
                    } else {
                        stats.reprojected += 1;
                    }
                    out.push(GeoPoint {
                        lat,
                        lon,
                        intensity: resolve_intensity(record),
                        attributes: record.clone(),
                    });
                }
                None => {
                    trace!(index, "Dropping record without a usable position");
                    stats.dropped += 1;
                }
            }
        }

        debug!(
            input = stats.input,
            passthrough = stats.passthrough,
            reprojected = stats.reprojected,
            dropped = stats.dropped,
            "Reprojected batch"
        );

        (out, stats)
    }

    /// Reproject a single record.
    pub fn reproject_one(&self, record: &RawPoint) -> Option<GeoPoint> {
        let (lat, lon, _) = self.locate(record)?;
        Some(GeoPoint {
            lat,
            lon,
            intensity: resolve_intensity(record),
            attributes: record.clone(),
        })
    }

    fn locate(&self, record: &RawPoint) -> Option<(f64, f64, bool)> {
        let (x, y) = PointValidator::coordinates(record)?;
        let position = self.projector.try_project(x, y).ok()?;
        Some((position.lat, position.lon, position.passthrough))
    }
}

/// Intensity of a record: the first present count-like field, else 1.
///
/// A present field that is not a finite, non-negative number also yields 1.
pub fn resolve_intensity(record: &RawPoint) -> f64 {
    match FieldKeys::INTENSITY.resolve_f64(record) {
        Some(count) if count.is_finite() && count >= 0.0 => count,
        _ => 1.0,
    }
}
