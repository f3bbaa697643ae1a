//! Density surface (heatmap) layer and its raster preview.

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::debug;

use map_common::{bounds, BoundingRegion, GeoPoint, Gradient, MapError, MapResult};
use projection::mercator::lat_lon_to_pixel;

use crate::config::HeatmapConfig;
use crate::png;

/// Largest raster edge accepted by [`DensitySurface::rasterize`].
pub const MAX_RASTER_DIMENSION: usize = 4096;

/// A single heat sample.
///
/// Serialized as `[lat, lon, intensity]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub lat: f64,
    pub lon: f64,
    pub intensity: f64,
}

impl Serialize for WeightedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.lat, self.lon, self.intensity).serialize(serializer)
    }
}

/// Continuous blended intensity surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySurface {
    pub weighted_points: Vec<WeightedPoint>,
    pub radius: f64,
    pub blur: f64,
    /// Largest intensity in the set, never below 1.
    pub max_intensity: f64,
    pub min_opacity: f32,
    pub max_zoom: u8,
    pub gradient: Gradient,
}

impl DensitySurface {
    pub fn from_points(points: &[GeoPoint], config: &HeatmapConfig) -> Self {
        let weighted_points: Vec<WeightedPoint> = points
            .iter()
            .map(|p| WeightedPoint {
                lat: p.lat,
                lon: p.lon,
                intensity: p.intensity,
            })
            .collect();

        let max_intensity = weighted_points
            .iter()
            .map(|p| p.intensity)
            .filter(|i| i.is_finite())
            .fold(1.0, f64::max);

        Self {
            weighted_points,
            radius: config.radius,
            blur: config.blur,
            max_intensity,
            min_opacity: config.min_opacity,
            max_zoom: config.max_zoom,
            gradient: config.gradient.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.weighted_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weighted_points.is_empty()
    }

    /// Bounding region of the samples.
    pub fn region(&self) -> Option<BoundingRegion> {
        let points: Vec<GeoPoint> = self
            .weighted_points
            .iter()
            .map(|p| GeoPoint::new(p.lat, p.lon))
            .collect();
        bounds(&points)
    }

    /// Kernel weight at `distance` pixels from a sample.
    ///
    /// Full weight at the center, falling linearly to zero at
    /// `radius + blur`; a hard disc when `blur` is zero.
    pub fn kernel(&self, distance: f64) -> f64 {
        if self.blur <= 0.0 {
            return if distance <= self.radius { 1.0 } else { 0.0 };
        }
        ((self.radius + self.blur - distance) / (2.0 * self.blur)).clamp(0.0, 1.0)
    }

    /// Render the surface over `region` into an RGBA raster.
    ///
    /// The region is framed with web Mercator scaling (uniform in both
    /// axes) and centered, leaving a margin of one kernel extent so samples
    /// on the edge of the region are not clipped.
    pub fn rasterize(
        &self,
        region: &BoundingRegion,
        width: usize,
        height: usize,
    ) -> MapResult<Raster> {
        if width == 0 || height == 0 || width > MAX_RASTER_DIMENSION || height > MAX_RASTER_DIMENSION
        {
            return Err(MapError::InvalidParameter {
                param: "size".to_string(),
                message: format!(
                    "{}x{} outside 1..={}",
                    width, height, MAX_RASTER_DIMENSION
                ),
            });
        }

        let frame = Frame::new(region, width, height, self.radius + self.blur);
        let density = self.accumulate(&frame, width, height);
        let pixels = self.colorize(&density, width);

        debug!(
            samples = self.len(),
            width,
            height,
            "Rasterized density surface"
        );

        Ok(Raster {
            width,
            height,
            pixels,
        })
    }

    /// Rasterize and encode as PNG.
    pub fn render_png(
        &self,
        region: &BoundingRegion,
        width: usize,
        height: usize,
    ) -> MapResult<Vec<u8>> {
        self.rasterize(region, width, height)?.to_png()
    }

    /// Splat every sample, compositing alpha the way a canvas does.
    fn accumulate(&self, frame: &Frame, width: usize, height: usize) -> Vec<f32> {
        let mut density = vec![0.0f32; width * height];
        let extent = self.radius + self.blur.max(0.0);

        for point in &self.weighted_points {
            if !point.lat.is_finite() || !point.lon.is_finite() || !point.intensity.is_finite() {
                continue;
            }
            let weight = (point.intensity / self.max_intensity).clamp(0.0, 1.0);
            if weight <= 0.0 {
                continue;
            }

            let (cx, cy) = frame.to_raster(point.lat, point.lon);
            let x_start = (cx - extent).floor().max(0.0) as usize;
            let y_start = (cy - extent).floor().max(0.0) as usize;
            let x_end = ((cx + extent).ceil().max(0.0) as usize).min(width);
            let y_end = ((cy + extent).ceil().max(0.0) as usize).min(height);

            for y in y_start..y_end {
                let dy = y as f64 + 0.5 - cy;
                for x in x_start..x_end {
                    let dx = x as f64 + 0.5 - cx;
                    let k = self.kernel((dx * dx + dy * dy).sqrt());
                    if k <= 0.0 {
                        continue;
                    }
                    let cell = &mut density[y * width + x];
                    let a = (weight * k) as f32;
                    *cell += a * (1.0 - *cell);
                }
            }
        }

        density
    }

    fn colorize(&self, density: &[f32], width: usize) -> Vec<u8> {
        let mut pixels = vec![0u8; density.len() * 4];
        let floor = self.min_opacity.clamp(0.0, 1.0);

        pixels
            .par_chunks_mut(width * 4)
            .zip(density.par_chunks(width))
            .for_each(|(row, values)| {
                for (pixel, &value) in row.chunks_exact_mut(4).zip(values) {
                    if value <= 0.0 {
                        continue;
                    }
                    let color = self.gradient.color_at(value);
                    let alpha = value.max(floor).min(1.0);
                    pixel[0] = color.r;
                    pixel[1] = color.g;
                    pixel[2] = color.b;
                    pixel[3] = (alpha * 255.0).round() as u8;
                }
            });

        pixels
    }
}

/// Maps lat/lon into raster pixel space for one render.
struct Frame {
    center: (f64, f64),
    scale: f64,
    half: (f64, f64),
}

impl Frame {
    fn new(region: &BoundingRegion, width: usize, height: usize, extent: f64) -> Self {
        let (x0, y0) = lat_lon_to_pixel(region.max_lat, region.min_lon, 0.0);
        let (x1, y1) = lat_lon_to_pixel(region.min_lat, region.max_lon, 0.0);

        let margin = extent.max(0.0).min(width.min(height) as f64 / 4.0);
        let inner_w = (width as f64 - 2.0 * margin).max(1.0);
        let inner_h = (height as f64 - 2.0 * margin).max(1.0);

        let span_x = (x1 - x0).abs();
        let span_y = (y1 - y0).abs();
        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (inner_w / span_x).min(inner_h / span_y),
            (true, false) => inner_w / span_x,
            (false, true) => inner_h / span_y,
            // Single location: everything lands on the center pixel
            (false, false) => 0.0,
        };

        Self {
            center: ((x0 + x1) / 2.0, (y0 + y1) / 2.0),
            scale,
            half: (width as f64 / 2.0, height as f64 / 2.0),
        }
    }

    fn to_raster(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (mx, my) = lat_lon_to_pixel(lat, lon, 0.0);
        (
            self.half.0 + (mx - self.center.0) * self.scale,
            self.half.1 + (my - self.center.1) * self.scale,
        )
    }
}

/// RGBA pixels, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Number of pixels with any opacity.
    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    pub fn to_png(&self) -> MapResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width, self.height).map_err(MapError::RenderError)
    }
}
