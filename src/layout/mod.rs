//! Header layout planning.
//!
//! Partitions a page into the shell's regions: the header row (icon, title,
//! logo), the gradient bar beneath it and the content frame that receives the
//! original page. Everything is derived from the page size and
//! [`ShellConfig`]; the planner has no state and performs no I/O.
//!
//! Coordinates use a top-left origin, y growing downwards.

use crate::config::ShellConfig;
use crate::geometry::{Point, Rect};

/// Placement of every shell element on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderLayout {
    /// Page width the layout was planned for
    pub page_width: f32,
    /// Page height the layout was planned for
    pub page_height: f32,
    /// Square header icon, top-left
    pub icon: Rect,
    /// Header logo, right-aligned
    pub logo: Rect,
    /// Baseline origin of the left-aligned title
    pub title_anchor: Point,
    /// Gradient bar spanning the inner width
    pub bar: Rect,
    /// Frame that receives the source page content
    pub content: Rect,
}

impl HeaderLayout {
    /// Plan the shell for a `page_width`×`page_height` page.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::config::ShellConfig;
    /// use pdf_shell::layout::HeaderLayout;
    ///
    /// let layout = HeaderLayout::plan(600.0, 800.0, &ShellConfig::default());
    /// assert_eq!(layout.bar.left(), 40.0);
    /// assert_eq!(layout.bar.right(), 560.0);
    /// assert_eq!(layout.bar.top(), 100.0);
    /// assert_eq!(layout.content.top(), 150.0);
    /// assert_eq!(layout.content.bottom(), 760.0);
    /// ```
    pub fn plan(page_width: f32, page_height: f32, config: &ShellConfig) -> Self {
        let margin = config.margin_x;

        let icon = Rect::new(margin, margin, config.icon_size, config.icon_size);

        let logo_x = page_width - margin - config.logo_width;
        let logo = Rect::new(logo_x, margin, config.logo_width, config.logo_height);

        let title_anchor = Point::new(
            margin + config.icon_size + config.title_gap,
            margin + (config.icon_size + config.title_font_size) / 2.0,
        );

        let header_bottom = margin
            + config
                .icon_size
                .max(config.logo_height)
                .max(config.title_font_size);
        let bar_top = header_bottom + config.spacing_before_bar;
        let inner_left = margin;
        let inner_right = page_width - margin;
        let bar = Rect::from_points(inner_left, bar_top, inner_right, bar_top + config.bar_height);

        let content = Rect::from_points(
            inner_left,
            bar.bottom(),
            inner_right,
            page_height - config.margin_y_bottom,
        );

        let layout = Self {
            page_width,
            page_height,
            icon,
            logo,
            title_anchor,
            bar,
            content,
        };

        log::debug!(
            "Planned {}x{} page: bar={:?} content={:?} body_fits={} bar_fits={}",
            page_width,
            page_height,
            layout.bar,
            layout.content,
            layout.body_fits(),
            layout.bar_fits()
        );

        layout
    }

    /// Whether the inner width and the content frame are positive.
    ///
    /// When they aren't, the page keeps only its header row: no gradient, no
    /// border and no embedded content.
    pub fn body_fits(&self) -> bool {
        self.page_width - 2.0 * self.bar.x > 0.0 && !self.content.is_degenerate()
    }

    /// Whether the gradient bar itself has positive area on a page whose
    /// body fits. A flat bar only drops the bar and its overlays.
    pub fn bar_fits(&self) -> bool {
        self.body_fits() && !self.bar.is_degenerate()
    }
}
