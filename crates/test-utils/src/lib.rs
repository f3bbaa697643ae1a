//! Shared test utilities for the panther-map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Known projected/geographic coordinate pairs
//! - Sample query rows in both field-naming conventions
//! - Deterministic point cloud generators
//! - Approximate-equality assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, generators, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// How far `actual` is from `expected`, if it is not within `tolerance`.
///
/// NaN on either side always counts as a mismatch.
pub fn approx_mismatch(actual: f64, expected: f64, tolerance: f64) -> Option<f64> {
    let diff = (actual - expected).abs();
    if diff <= tolerance {
        None
    } else {
        Some(diff)
    }
}

/// Assert that two floats agree within a tolerance.
///
/// An optional trailing format string names the quantity in the failure
/// message.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(lat, 26.2, 1e-7);
/// assert_approx_eq!(x, 36052.69, 1e-3, "easting of {}", name);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        $crate::assert_approx_eq!($actual, $expected, $tolerance, "value")
    };
    ($actual:expr, $expected:expr, $tolerance:expr, $($context:tt)+) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let tolerance = $tolerance as f64;
        if let Some(diff) = $crate::approx_mismatch(actual, expected, tolerance) {
            panic!(
                "assertion failed: {} is {}, expected {} (off by {}, tolerance {})",
                format_args!($($context)+),
                actual,
                expected,
                diff,
                tolerance
            );
        }
    }};
}

/// Assert that two `(f64, f64)` pairs agree component-wise.
///
/// Works for (lat, lon), (x, y) and pixel pairs alike.
///
/// ```ignore
/// assert_coords_approx_eq!(region.center, (26.35, -81.75), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: (f64, f64) = $actual;
        let expected: (f64, f64) = $expected;
        $crate::assert_approx_eq!(actual.0, expected.0, $tolerance, "first of {:?}", actual);
        $crate::assert_approx_eq!(actual.1, expected.1, $tolerance, "second of {:?}", actual);
    }};
}
