//! Spherical (web) Mercator pixel math for slippy-map zoom levels.

use std::f64::consts::PI;

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// World size in pixels at a zoom level.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Convert lat/lon (degrees) to world pixel coordinates at `zoom`.
///
/// Origin is the top-left corner; y grows southward.
pub fn lat_lon_to_pixel(lat: f64, lon: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin_lat = lat.to_radians().sin();

    let x = (lon + 180.0) / 360.0 * size;
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// Convert world pixel coordinates at `zoom` back to lat/lon (degrees).
pub fn pixel_to_lat_lon(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lon = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    #[test]
    fn test_origin_is_world_center() {
        assert_coords_approx_eq!(lat_lon_to_pixel(0.0, 0.0, 0.0), (128.0, 128.0), 1e-9);
    }

    #[test]
    fn test_zoom_doubles_world() {
        let (x0, y0) = lat_lon_to_pixel(26.2, -81.5, 10.0);
        let (x1, y1) = lat_lon_to_pixel(26.2, -81.5, 11.0);
        assert_approx_eq!(x1, 2.0 * x0, 1e-6, "x at zoom 11");
        assert_approx_eq!(y1, 2.0 * y0, 1e-6, "y at zoom 11");
    }

    #[test]
    fn test_pixel_roundtrip() {
        let (x, y) = lat_lon_to_pixel(26.2, -81.5, 12.0);
        assert_coords_approx_eq!(pixel_to_lat_lon(x, y, 12.0), (26.2, -81.5), 1e-9);
    }
}
