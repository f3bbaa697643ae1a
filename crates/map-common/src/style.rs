//! Colors and color gradients for map layers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MapError;

/// Color value in RGBA format.
///
/// Serialized as a `#rrggbb` (or `#rrggbbaa` when translucent) string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse a CSS color name or hex string (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub fn parse(s: &str) -> Result<Self, MapError> {
        let trimmed = s.trim();
        if let Some(color) = named_color(&trimmed.to_lowercase()) {
            return Ok(color);
        }
        hex_to_rgba(trimmed).ok_or_else(|| MapError::InvalidColor(s.to_string()))
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "lime" => Color::rgb(0, 255, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "gold" => Color::rgb(255, 215, 0),
        "transparent" => Color::transparent(),
        _ => return None,
    };
    Some(color)
}

/// Parse hex color string to RGBA
pub fn hex_to_rgba(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// A color at a relative position in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Piecewise-linear color ramp over relative intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradientStop>", into = "Vec<GradientStop>")]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Build a gradient; stops are sorted by offset and clamped to `[0, 1]`.
    pub fn new(stops: Vec<GradientStop>) -> Result<Self, MapError> {
        if stops.is_empty() {
            return Err(MapError::Config("gradient needs at least one stop".into()));
        }

        let mut stops: Vec<GradientStop> = stops
            .into_iter()
            .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), s.color))
            .collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        Ok(Self { stops })
    }

    /// The heatmap ramp: blue, cyan, lime, yellow, red at 0.2 steps.
    pub fn heatmap() -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.2, Color::rgb(0, 0, 255)),
                GradientStop::new(0.4, Color::rgb(0, 255, 255)),
                GradientStop::new(0.6, Color::rgb(0, 255, 0)),
                GradientStop::new(0.8, Color::rgb(255, 255, 0)),
                GradientStop::new(1.0, Color::rgb(255, 0, 0)),
            ],
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at relative position `t`.
    ///
    /// Positions before the first stop take the first color and positions
    /// past the last stop take the last color.
    pub fn color_at(&self, t: f32) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if t.is_nan() || t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.offset {
                let span = hi.offset - lo.offset;
                let local = if span > 0.0 { (t - lo.offset) / span } else { 1.0 };
                return interpolate_color(lo.color, hi.color, local);
            }
        }

        last.color
    }
}

impl TryFrom<Vec<GradientStop>> for Gradient {
    type Error = MapError;

    fn try_from(stops: Vec<GradientStop>) -> Result<Self, Self::Error> {
        Gradient::new(stops)
    }
}

impl From<Gradient> for Vec<GradientStop> {
    fn from(gradient: Gradient) -> Self {
        gradient.stops
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::heatmap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!(Color::parse("lime").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::parse("#FFD700").unwrap(), Color::rgb(255, 215, 0));
        assert_eq!(Color::parse("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("mauve-ish").is_err());
    }

    #[test]
    fn test_hex_roundtrip_through_serde() {
        let json = serde_json::to_string(&Color::rgb(255, 215, 0)).unwrap();
        assert_eq!(json, "\"#ffd700\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(255, 215, 0));
    }

    #[test]
    fn test_heatmap_gradient_stops() {
        let gradient = Gradient::heatmap();
        assert_eq!(gradient.stops().len(), 5);
        assert_eq!(gradient.color_at(0.0), Color::rgb(0, 0, 255));
        assert_eq!(gradient.color_at(0.6), Color::rgb(0, 255, 0));
        assert_eq!(gradient.color_at(1.5), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_gradient_midpoint() {
        let gradient = Gradient::heatmap();
        // Halfway between yellow (0.8) and red (1.0)
        let c = gradient.color_at(0.9);
        assert_eq!(c.r, 255);
        assert!(c.g > 120 && c.g < 135, "got {}", c.g);
        assert_eq!(c.b, 0);
    }

    #[test]
    fn test_gradient_sorts_stops() {
        let gradient = Gradient::new(vec![
            GradientStop::new(1.0, Color::rgb(255, 0, 0)),
            GradientStop::new(0.0, Color::rgb(0, 0, 255)),
        ])
        .unwrap();
        assert_eq!(gradient.stops()[0].offset, 0.0);
        assert!(Gradient::new(Vec::new()).is_err());
    }
}
