//! Property tests for the gradient bar rasterizer and the layout planner.

use pdf_shell::raster::{corner_radius, render_gradient_bar};
use pdf_shell::{HeaderLayout, Rgb, ShellConfig};
use proptest::prelude::*;

fn rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

proptest! {
    #[test]
    fn edges_match_endpoint_colors(
        width in 1u32..300,
        height in 2u32..80,
        start in rgb(),
        end in rgb(),
    ) {
        let bar = render_gradient_bar(width, height, start, end, corner_radius(height, 15));
        let bottom = height - 1;

        let left = bar.pixel(0, bottom);
        prop_assert_eq!(&left[..3], &[start.r, start.g, start.b][..]);
        if width > 1 {
            let right = bar.pixel(width - 1, bottom);
            prop_assert_eq!(&right[..3], &[end.r, end.g, end.b][..]);
        }
    }

    #[test]
    fn columns_are_monotonic_for_ordered_endpoints(
        width in 2u32..300,
        start in rgb(),
        end in rgb(),
    ) {
        let lo = Rgb::new(start.r.min(end.r), start.g.min(end.g), start.b.min(end.b));
        let hi = Rgb::new(start.r.max(end.r), start.g.max(end.g), start.b.max(end.b));
        let bar = render_gradient_bar(width, 4, lo, hi, 0);

        for x in 1..width {
            let prev = bar.pixel(x - 1, 3);
            let cur = bar.pixel(x, 3);
            for channel in 0..3 {
                prop_assert!(prev[channel] <= cur[channel]);
            }
        }
    }

    #[test]
    fn mask_rounds_only_the_top_corners(
        width in 1u32..300,
        height in 1u32..80,
        cap in 0u32..30,
    ) {
        let radius = corner_radius(height, cap);
        let bar = render_gradient_bar(width, height, Rgb::GRADIENT_START, Rgb::GRADIENT_END, radius);

        // Bottom row is never rounded.
        for x in 0..width {
            prop_assert_eq!(bar.pixel(x, height - 1)[3], 255);
        }
        // Rows at or below the radius are untouched.
        for y in radius.min(height)..height {
            prop_assert_eq!(bar.pixel(0, y)[3], 255);
            prop_assert_eq!(bar.pixel(width - 1, y)[3], 255);
        }
        if radius > 0 && height >= 2 {
            prop_assert_eq!(bar.pixel(0, 0)[3], 0);
            prop_assert_eq!(bar.pixel(width - 1, 0)[3], 0);
        }
        // Left and right corners mirror each other.
        for y in 0..height {
            for x in 0..width {
                prop_assert_eq!(bar.pixel(x, y)[3], bar.pixel(width - 1 - x, y)[3]);
            }
        }
    }

    #[test]
    fn rendering_is_deterministic(width in 1u32..200, height in 1u32..60) {
        let radius = corner_radius(height, 15);
        let a = render_gradient_bar(width, height, Rgb::GRADIENT_START, Rgb::GRADIENT_END, radius);
        let b = render_gradient_bar(width, height, Rgb::GRADIENT_START, Rgb::GRADIENT_END, radius);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn layout_regions_stay_in_order(width in 1.0f32..2000.0, height in 1.0f32..3000.0) {
        let config = ShellConfig::default();
        let layout = HeaderLayout::plan(width, height, &config);

        prop_assert_eq!(layout.icon.top(), config.margin_x);
        prop_assert!(layout.bar.top() >= layout.icon.bottom());
        prop_assert_eq!(layout.content.top(), layout.bar.bottom());
        if layout.body_fits() {
            prop_assert!(layout.content.bottom() <= height);
            prop_assert!(layout.bar.right() <= width);
            prop_assert!(width > 2.0 * config.margin_x);
        }
    }
}
