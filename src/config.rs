//! Configuration for shell rendering.
//!
//! Every size, color and label used by the layout planner, the gradient
//! rasterizer and the compositor lives in [`ShellConfig`]. The struct is
//! passed by reference into each component so alternate values can be
//! exercised deterministically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::{Color, Rgb};
use crate::error::{Error, Result};

/// Title printed next to the header icon when none is given.
pub const DEFAULT_TITLE: &str = "CRUZEIRO";

/// Label printed over the gradient bar when none is configured.
pub const DEFAULT_BAR_LABEL: &str = "Dados do documento";

/// Shell rendering configuration.
///
/// All lengths are in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Left, right and top margin; also the header's top offset.
    pub margin_x: f32,
    /// Space left below the content frame.
    pub margin_y_bottom: f32,

    /// Side of the square header icon.
    pub icon_size: f32,
    /// Width of the right-aligned logo.
    pub logo_width: f32,
    /// Height of the right-aligned logo.
    pub logo_height: f32,

    /// Font size of the header title.
    pub title_font_size: f32,
    /// Horizontal gap between the icon and the title.
    pub title_gap: f32,
    /// Fill color of the title.
    pub title_color: Color,

    /// Height of the gradient bar.
    pub bar_height: f32,
    /// Vertical gap between the header row and the bar.
    pub spacing_before_bar: f32,
    /// Left end color of the gradient.
    pub gradient_start: Rgb,
    /// Right end color of the gradient.
    pub gradient_end: Rgb,
    /// Upper bound for the rounded top corner radius, in pixels.
    pub corner_radius_cap: u32,

    /// Text drawn over the bar.
    pub bar_label: String,
    /// Font size of the bar label.
    pub bar_label_font_size: f32,
    /// Distance from the bar's left edge to the label.
    pub bar_label_offset_x: f32,
    /// Label baseline as a fraction of the bar height from its top.
    pub bar_label_baseline_ratio: f32,
    /// Fill color of the bar label.
    pub bar_label_color: Color,

    /// Small icon drawn at the left of the bar; skipped when unset.
    pub bar_icon_path: Option<PathBuf>,
    /// Largest side the bar icon may take.
    pub bar_icon_max_size: f32,
    /// Distance from the bar's left edge to the bar icon.
    pub bar_icon_inset: f32,
    /// Vertical room kept free around the bar icon (`bar_height - padding`).
    pub bar_icon_padding: f32,

    /// Stroke color of the content frame.
    pub border_color: Color,
    /// Stroke width of the content frame.
    pub border_width: f32,

    /// Standard Type1 font used for title and label.
    pub font: String,
    /// Compress content streams with FlateDecode.
    pub compress: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellConfig {
    /// Create a configuration with the stock shell layout.
    pub fn new() -> Self {
        Self {
            margin_x: 40.0,
            margin_y_bottom: 40.0,
            icon_size: 40.0,
            logo_width: 100.0,
            logo_height: 40.0,
            title_font_size: 20.0,
            title_gap: 15.0,
            title_color: Color::black(),
            bar_height: 50.0,
            spacing_before_bar: 20.0,
            gradient_start: Rgb::GRADIENT_START,
            gradient_end: Rgb::GRADIENT_END,
            corner_radius_cap: 15,
            bar_label: DEFAULT_BAR_LABEL.to_string(),
            bar_label_font_size: 14.0,
            bar_label_offset_x: 50.0,
            bar_label_baseline_ratio: 0.6,
            bar_label_color: Color::white(),
            bar_icon_path: None,
            bar_icon_max_size: 18.0,
            bar_icon_inset: 15.0,
            bar_icon_padding: 15.0,
            border_color: Color::gray(0.85),
            border_width: 0.5,
            font: "Helvetica".to_string(),
            compress: true,
        }
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Set the horizontal/top margin.
    pub fn with_margin_x(mut self, margin: f32) -> Self {
        self.margin_x = margin;
        self
    }

    /// Set the bottom margin.
    pub fn with_margin_y_bottom(mut self, margin: f32) -> Self {
        self.margin_y_bottom = margin;
        self
    }

    /// Set the gradient bar height.
    pub fn with_bar_height(mut self, height: f32) -> Self {
        self.bar_height = height;
        self
    }

    /// Set both gradient endpoint colors.
    pub fn with_gradient(mut self, start: Rgb, end: Rgb) -> Self {
        self.gradient_start = start;
        self.gradient_end = end;
        self
    }

    /// Set the rounded corner radius cap.
    pub fn with_corner_radius_cap(mut self, cap: u32) -> Self {
        self.corner_radius_cap = cap;
        self
    }

    /// Set the text drawn over the bar.
    pub fn with_bar_label(mut self, label: impl Into<String>) -> Self {
        self.bar_label = label.into();
        self
    }

    /// Set the icon drawn at the left of the bar.
    pub fn with_bar_icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.bar_icon_path = Some(path.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}
