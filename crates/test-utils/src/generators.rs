//! Test data generators for creating synthetic tracking data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. They are deterministic: the
//! same arguments always give the same rows.

use serde_json::{json, Map, Value};

/// Minimal linear congruential generator so fixtures need no RNG crate.
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x5DEE_CE66_D)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Next value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Creates geographic rows scattered over a lat/lon box.
///
/// # Arguments
///
/// * `count` - Number of rows
/// * `region` - (min_lat, max_lat, min_lon, max_lon)
/// * `seed` - Generator seed
///
/// # Example
///
/// ```
/// use test_utils::create_geographic_rows;
///
/// let rows = create_geographic_rows(10, (25.5, 27.0, -82.2, -80.8), 7);
/// assert_eq!(rows.len(), 10);
/// assert!(rows[0].contains_key("x"));
/// ```
pub fn create_geographic_rows(
    count: usize,
    region: (f64, f64, f64, f64),
    seed: u64,
) -> Vec<Map<String, Value>> {
    let (min_lat, max_lat, min_lon, max_lon) = region;
    let mut rng = Lcg::new(seed);

    (0..count)
        .map(|i| {
            let lat = rng.range(min_lat, max_lat);
            let lon = rng.range(min_lon, max_lon);
            obj(json!({"x": lon, "y": lat, "id": i}))
        })
        .collect()
}

/// Creates projected (ftUS) rows scattered around a projected center.
///
/// Each row gets a `VisitCount` between 1 and 50.
pub fn create_projected_rows(
    count: usize,
    center: (f64, f64),
    spread_ft: f64,
    seed: u64,
) -> Vec<Map<String, Value>> {
    let mut rng = Lcg::new(seed);

    (0..count)
        .map(|i| {
            let x = center.0 + rng.range(-spread_ft, spread_ft);
            let y = center.1 + rng.range(-spread_ft, spread_ft);
            let visits = 1 + (rng.next_f64() * 50.0) as u64;
            obj(json!({"X": x, "Y": y, "VisitCount": visits, "id": i}))
        })
        .collect()
}

/// Creates `count` rows all at the same geographic position.
pub fn create_stacked_rows(count: usize, lat: f64, lon: f64) -> Vec<Map<String, Value>> {
    (0..count)
        .map(|i| obj(json!({"x": lon, "y": lat, "id": i})))
        .collect()
}

/// Interleaves `bad_every`-th corrupt rows into `rows`.
///
/// Returns the combined rows and how many corrupt rows were inserted.
pub fn with_corrupt_rows(
    rows: Vec<Map<String, Value>>,
    bad_every: usize,
) -> (Vec<Map<String, Value>>, usize) {
    let mut out = Vec::with_capacity(rows.len() + rows.len() / bad_every.max(1) + 1);
    let mut inserted = 0;

    for (i, r) in rows.into_iter().enumerate() {
        if bad_every > 0 && i % bad_every == 0 {
            out.push(obj(json!({"x": "NaN", "y": 26.0, "corrupt": true})));
            inserted += 1;
        }
        out.push(r);
    }

    (out, inserted)
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
