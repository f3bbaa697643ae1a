//! Common types and utilities shared across the panther-map crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod point;
pub mod style;

pub use bbox::{bounds, BoundingRegion, BoundsAccumulator};
pub use crs::{CrsCode, InputMode};
pub use error::{MapError, MapResult};
pub use point::{FieldKeys, GeoPoint, RawPoint};
pub use style::{Color, Gradient, GradientStop};
