//! Common test fixtures for panther-map tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios in tracking and mortality data processing.

use serde_json::{json, Map, Value};

/// Convert a JSON object literal into a query row.
///
/// Panics if `value` is not an object; fixtures are always objects.
pub fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture row must be a JSON object, got {}", other),
    }
}

/// Known coordinate pairs on NAD83 / Florida East (ftUS).
pub mod florida_east {
    /// A reference location: geographic (lat, lon) and projected (x, y) ftUS.
    #[derive(Debug, Clone, Copy)]
    pub struct KnownPoint {
        pub name: &'static str,
        pub lat: f64,
        pub lon: f64,
        pub x: f64,
        pub y: f64,
    }

    /// False origin of the zone
    pub const ORIGIN: KnownPoint = KnownPoint {
        name: "origin",
        lat: 24.33333333333333,
        lon: -81.0,
        x: 200000.0001016002,
        y: 0.0,
    };

    /// Big Cypress National Preserve
    pub const BIG_CYPRESS: KnownPoint = KnownPoint {
        name: "big_cypress",
        lat: 26.2,
        lon: -81.5,
        x: 36052.693297276324,
        y: 678698.5012176891,
    };

    /// Florida Panther National Wildlife Refuge
    pub const PANTHER_REFUGE: KnownPoint = KnownPoint {
        name: "panther_refuge",
        lat: 26.5,
        lon: -82.0,
        x: -127057.40573115302,
        y: 788698.2186346474,
    };

    /// East of the central meridian
    pub const EAST_COAST: KnownPoint = KnownPoint {
        name: "east_coast",
        lat: 25.0,
        lon: -80.0,
        x: 531191.8235327061,
        y: 243481.41447211133,
    };

    /// All known points.
    pub const ALL: [KnownPoint; 4] = [ORIGIN, BIG_CYPRESS, PANTHER_REFUGE, EAST_COAST];
}

/// Common region definitions for testing, as (min_lat, max_lat, min_lon, max_lon).
pub mod regions {
    /// Southwest Florida panther range
    pub const SOUTHWEST_FLORIDA: (f64, f64, f64, f64) = (25.5, 27.0, -82.2, -80.8);

    /// Default map center (lat, lon)
    pub const MAP_CENTER: (f64, f64) = (26.23, -81.59);
}

/// Sample query rows as returned by the hosted database.
pub mod rows {
    use super::*;

    /// Mortality heatmap rows (upper-case convention, already geographic).
    pub fn mortality_geographic() -> Vec<Map<String, Value>> {
        vec![
            row(json!({"X": -81.5, "Y": 26.2, "Cause": "Vehicle", "CauseCount": 3})),
            row(json!({"X": -81.4, "Y": 26.1, "Cause": "Intraspecific aggression"})),
            row(json!({"X": -81.9, "Y": 26.4, "Cause": "Unknown", "CauseCount": 1})),
        ]
    }

    /// Telemetry top-location rows (lower-case convention, projected ftUS).
    pub fn telemetry_projected() -> Vec<Map<String, Value>> {
        vec![
            row(json!({
                "x": florida_east::BIG_CYPRESS.x,
                "y": florida_east::BIG_CYPRESS.y,
                "visit_count": 42
            })),
            row(json!({
                "x": florida_east::PANTHER_REFUGE.x,
                "y": florida_east::PANTHER_REFUGE.y,
                "visit_count": 17
            })),
        ]
    }

    /// The two-point scenario: one with a visit count, one without.
    pub fn scenario_two_points() -> Vec<Map<String, Value>> {
        vec![
            row(json!({"x": -81.5, "y": 26.2, "visit_count": 5})),
            row(json!({"x": -82.0, "y": 26.5})),
        ]
    }

    /// Rows that must all be dropped.
    pub fn corrupt() -> Vec<Map<String, Value>> {
        vec![
            row(json!({"x": "NaN", "y": 26.2})),
            row(json!({"x": null, "y": 26.2})),
            row(json!({"y": 26.2})),
            row(json!({"x": "east", "y": "north"})),
            row(json!({"x": 1.0e12, "y": 1.0e12})),
        ]
    }
}
