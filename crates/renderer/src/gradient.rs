//! Two-stop color gradient for contour levels.
//!
//! Colors are a pure function of the level and the level range; there is
//! no shared palette state.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// KML color string: `aabbggrr` in lowercase hex.
    pub fn to_kml_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.a, self.b, self.g, self.r)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f64 * t_inv) + (color2.r as f64 * t)) as u8,
        ((color1.g as f64 * t_inv) + (color2.g as f64 * t)) as u8,
        ((color1.b as f64 * t_inv) + (color2.b as f64 * t)) as u8,
        ((color1.a as f64 * t_inv) + (color2.a as f64 * t)) as u8,
    )
}

/// Gradient between a low and a high color stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearGradient {
    pub low: Color,
    pub high: Color,
}

impl Default for LinearGradient {
    /// Blue for the shortest durations, red for the longest.
    fn default() -> Self {
        Self::new(Color::BLUE, Color::RED)
    }
}

impl LinearGradient {
    pub fn new(low: Color, high: Color) -> Self {
        Self { low, high }
    }

    /// Color for `level` placed between `min_level` and `max_level`.
    ///
    /// Channels are truncated to 8 bits. A degenerate range maps every
    /// level to the low color.
    pub fn color_for(&self, level: f64, min_level: f64, max_level: f64) -> Color {
        let range = max_level - min_level;
        if !(range > 0.0) || !level.is_finite() {
            return self.low;
        }
        interpolate_color(self.low, self.high, (level - min_level) / range)
    }
}

/// Blue-to-red color for `level` within `[min_level, max_level]`.
pub fn color_for(level: f64, min_level: f64, max_level: f64) -> Color {
    LinearGradient::default().color_for(level, min_level, max_level)
}
