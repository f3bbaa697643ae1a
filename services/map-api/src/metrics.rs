//! Prometheus counters for the query endpoints.

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_request(endpoint: &'static str) {
    counter!("map_api_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_query_error(endpoint: &'static str) {
    counter!("map_api_query_errors_total", "endpoint" => endpoint).increment(1);
}

/// Round trip to the database for one stored procedure call.
pub fn record_query_duration(endpoint: &'static str, elapsed: Duration) {
    histogram!("map_api_query_duration_ms", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64() * 1000.0);
}

/// Records that could not be placed on the map.
pub fn record_dropped_points(endpoint: &'static str, dropped: usize) {
    if dropped > 0 {
        counter!("map_api_dropped_points_total", "endpoint" => endpoint).increment(dropped as u64);
    }
}

pub fn record_rows(endpoint: &'static str, rows: usize) {
    counter!("map_api_rows_total", "endpoint" => endpoint).increment(rows as u64);
}
