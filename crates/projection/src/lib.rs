//! Coordinate reference system transformations.
//!
//! Implements the projection math from scratch,
//! plus the point and batch reprojection used by the map pipeline.

pub mod batch;
pub mod ellipsoid;
pub mod mercator;
pub mod projector;
pub mod transverse_mercator;
pub mod validate;

pub use batch::{resolve_intensity, BatchReprojector, ReprojectStats};
pub use ellipsoid::Ellipsoid;
pub use projector::{CoordinateProjector, ProjectedPosition, ProjectionConfig};
pub use transverse_mercator::{LinearUnit, TransverseMercator};
pub use validate::PointValidator;
