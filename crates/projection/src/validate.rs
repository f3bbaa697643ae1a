//! Coordinate sanity checks applied before projection.

use map_common::{FieldKeys, RawPoint};

/// Decides whether a coordinate pair is usable at all.
///
/// Only geographic ranges are checked here. Projected coordinates have no
/// cheap range test; they are rejected later if the inverse transform
/// yields nothing sensible.
pub struct PointValidator;

impl PointValidator {
    /// Valid when both values are present, finite, and inside the
    /// geographic ranges (`x` as longitude, `y` as latitude).
    pub fn is_valid(x: Option<f64>, y: Option<f64>) -> bool {
        match (x, y) {
            (Some(x), Some(y)) => Self::in_geographic_range(x, y),
            _ => false,
        }
    }

    /// `is_valid` applied to a raw record's coordinate fields.
    pub fn is_valid_record(record: &RawPoint) -> bool {
        Self::is_valid(
            FieldKeys::X.resolve_f64(record),
            FieldKeys::Y.resolve_f64(record),
        )
    }

    /// `|x| <= 180` and `|y| <= 90`. NaN fails both comparisons.
    pub fn in_geographic_range(x: f64, y: f64) -> bool {
        x.abs() <= 180.0 && y.abs() <= 90.0
    }

    /// Extract a finite coordinate pair from a record, if it has one.
    ///
    /// This is the corruption check run before any projection attempt:
    /// missing, null, non-numeric and non-finite values are all rejected.
    pub fn coordinates(record: &RawPoint) -> Option<(f64, f64)> {
        let x = FieldKeys::X.resolve_f64(record)?;
        let y = FieldKeys::Y.resolve_f64(record)?;
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}
