//! Color types.
//!
//! [`Rgb`] is the 8-bit color used by the gradient rasterizer, [`Color`] the
//! normalized color handed to PDF fill/stroke operators.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0 - 255)
    pub r: u8,
    /// Green channel (0 - 255)
    pub g: u8,
    /// Blue channel (0 - 255)
    pub b: u8,
}

impl Rgb {
    /// Left end of the header gradient, `#04436F`.
    pub const GRADIENT_START: Rgb = Rgb::new(4, 67, 111);

    /// Right end of the header gradient, `#C55117`.
    pub const GRADIENT_END: Rgb = Rgb::new(197, 81, 23);

    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other` at ratio `t`.
    ///
    /// Each channel is `round(a + (b - a) * t)`; `t` is clamped to `[0, 1]`
    /// so the result always stays between the two endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::color::Rgb;
    ///
    /// let start = Rgb::new(0, 100, 200);
    /// let end = Rgb::new(255, 100, 0);
    /// assert_eq!(start.lerp(end, 0.0), start);
    /// assert_eq!(start.lerp(end, 1.0), end);
    /// assert_eq!(start.lerp(end, 0.5), Rgb::new(128, 100, 100));
    /// ```
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| -> u8 {
            let a = f32::from(a);
            let b = f32::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(self.r, other.r), channel(self.g, other.g), channel(self.b, other.b))
    }

    /// The same color with an alpha channel, as `[r, g, b, a]`.
    pub fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Normalized RGB color for vector drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Create a neutral gray.
    pub fn gray(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::new(
            f32::from(rgb.r) / 255.0,
            f32::from(rgb.g) / 255.0,
            f32::from(rgb.b) / 255.0,
        )
    }
}
