//! Gradient bar rasterization.
//!
//! The header bar is synthesized as an RGBA bitmap: a horizontal linear
//! blend between two colors whose top-left and top-right corners are cut to
//! a quarter circle through the alpha channel. Bottom corners stay square.
//!
//! ```
//! use pdf_shell::color::Rgb;
//! use pdf_shell::raster::{corner_radius, render_gradient_bar};
//!
//! let radius = corner_radius(50, 15);
//! let bar = render_gradient_bar(520, 50, Rgb::GRADIENT_START, Rgb::GRADIENT_END, radius);
//! assert_eq!(bar.pixel(0, 49), [4, 67, 111, 255]);
//! assert_eq!(bar.pixel(519, 49), [197, 81, 23, 255]);
//! assert_eq!(bar.pixel(0, 0)[3], 0);
//! ```

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::color::Rgb;

/// An owned RGBA raster whose alpha channel carries the corner mask.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBitmap {
    image: RgbaImage,
}

impl GradientBitmap {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The `[r, g, b, a]` value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Borrow the underlying image buffer.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Radius of the rounded top corners for a bar `height` pixels tall.
///
/// A quarter of the height, never more than `cap`.
pub fn corner_radius(height: u32, cap: u32) -> u32 {
    (height / 4).min(cap)
}

/// Render a `width`×`height` gradient bar.
///
/// Column `x` gets `start.lerp(end, x / (width - 1))` (ratio 0 for a single
/// column), fully opaque. When `radius > 0`, the two top corner squares of
/// side `radius + 1` become transparent outside a quarter disc of that
/// radius.
///
/// Callers skip degenerate geometry; a zero dimension produces an empty
/// bitmap.
pub fn render_gradient_bar(
    width: u32,
    height: u32,
    start: Rgb,
    end: Rgb,
    radius: u32,
) -> GradientBitmap {
    let mut image = RgbaImage::new(width, height);

    for x in 0..width {
        let ratio = if width > 1 {
            x as f32 / (width - 1) as f32
        } else {
            0.0
        };
        let pixel = Rgba(start.lerp(end, ratio).with_alpha(255));
        for y in 0..height {
            image.put_pixel(x, y, pixel);
        }
    }

    let mask = top_corner_mask(width, height, radius);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        pixel.0[3] = mask.get_pixel(x, y).0[0];
    }

    GradientBitmap { image }
}

/// Build the single-channel mask for the rounded top corners.
///
/// Starts fully opaque, clears the `[0, r]×[0, r]` corner square and paints
/// the quarter disc centered on `(r, r)` back in. The top-right corner is
/// the mirror image. The bottom row is never touched.
fn top_corner_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([255]));
    if radius == 0 || width == 0 || height < 2 {
        return mask;
    }

    let r = i64::from(radius);
    let cols = radius.min(width - 1);
    let rows = radius.min(height - 2);
    for y in 0..=rows {
        for x in 0..=cols {
            let dx = r - i64::from(x);
            let dy = r - i64::from(y);
            if dx * dx + dy * dy > r * r {
                mask.put_pixel(x, y, Luma([0]));
                mask.put_pixel(width - 1 - x, y, Luma([0]));
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_bar(width: u32, height: u32) -> GradientBitmap {
        render_gradient_bar(
            width,
            height,
            Rgb::GRADIENT_START,
            Rgb::GRADIENT_END,
            corner_radius(height, 15),
        )
    }

    #[test]
    fn test_corner_radius() {
        assert_eq!(corner_radius(50, 15), 12);
        assert_eq!(corner_radius(100, 15), 15);
        assert_eq!(corner_radius(3, 15), 0);
        assert_eq!(corner_radius(50, 0), 0);
    }

    #[test]
    fn test_dimensions() {
        let bar = stock_bar(520, 50);
        assert_eq!(bar.width(), 520);
        assert_eq!(bar.height(), 50);
    }

    #[test]
    fn test_edge_columns_match_endpoints() {
        let bar = stock_bar(520, 50);
        for y in 13..50 {
            assert_eq!(bar.pixel(0, y), [4, 67, 111, 255]);
            assert_eq!(bar.pixel(519, y), [197, 81, 23, 255]);
        }
    }

    #[test]
    fn test_single_column_uses_start_color() {
        let bar = render_gradient_bar(1, 8, Rgb::GRADIENT_START, Rgb::GRADIENT_END, 0);
        for y in 0..8 {
            assert_eq!(bar.pixel(0, y), [4, 67, 111, 255]);
        }
    }

    #[test]
    fn test_columns_are_uniform() {
        let bar = stock_bar(64, 40);
        for x in 0..64 {
            let bottom = bar.pixel(x, 39);
            for y in 11..40 {
                assert_eq!(bar.pixel(x, y), bottom);
            }
        }
    }

    #[test]
    fn test_top_corners_are_rounded() {
        let bar = stock_bar(520, 50);
        let r = 12;
        assert_eq!(bar.pixel(0, 0)[3], 0);
        assert_eq!(bar.pixel(519, 0)[3], 0);
        assert_eq!(bar.pixel(r, r)[3], 255);
        assert_eq!(bar.pixel(519 - r, r)[3], 255);
        // Points on the arc itself stay opaque.
        assert_eq!(bar.pixel(r, 0)[3], 255);
        assert_eq!(bar.pixel(0, r)[3], 255);
        // Just inside the corner square but outside the arc.
        assert_eq!(bar.pixel(1, 1)[3], 0);
        assert_eq!(bar.pixel(518, 1)[3], 0);
    }

    #[test]
    fn test_corner_mask_is_symmetric() {
        let bar = stock_bar(101, 60);
        for y in 0..60 {
            for x in 0..101 {
                assert_eq!(bar.pixel(x, y)[3], bar.pixel(100 - x, y)[3], "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_bottom_corners_stay_square() {
        for height in [4, 10, 50, 120] {
            let bar = stock_bar(80, height);
            assert_eq!(bar.pixel(0, height - 1)[3], 255);
            assert_eq!(bar.pixel(79, height - 1)[3], 255);
        }
    }

    #[test]
    fn test_zero_radius_is_fully_opaque() {
        let bar = render_gradient_bar(30, 3, Rgb::GRADIENT_START, Rgb::GRADIENT_END, 0);
        assert!(bar.as_image().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_radius_larger_than_bitmap() {
        let bar = render_gradient_bar(4, 4, Rgb::GRADIENT_START, Rgb::GRADIENT_END, 15);
        assert_eq!(bar.pixel(0, 0)[3], 0);
        assert_eq!(bar.pixel(3, 0)[3], 0);
        assert_eq!(bar.pixel(0, 3)[3], 255);
        assert_eq!(bar.pixel(3, 3)[3], 255);
    }

    #[test]
    fn test_empty_bitmap() {
        let bar = render_gradient_bar(0, 0, Rgb::GRADIENT_START, Rgb::GRADIENT_END, 5);
        assert_eq!(bar.width(), 0);
        assert_eq!(bar.height(), 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(stock_bar(333, 50), stock_bar(333, 50));
    }
}
