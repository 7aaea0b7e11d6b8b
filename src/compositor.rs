//! Per-page shell composition.
//!
//! [`PageShellCompositor::render_page`] produces one output page for one
//! source page: header icon, logo and title, the gradient bar with its label
//! and icon, the content frame border and finally the source page itself.
//!
//! Decorative elements never fail a page. Each one ends up either
//! [`ElementOutcome::Placed`] or [`ElementOutcome::Skipped`], and the
//! outcomes are collected into a [`DecorationReport`].

use std::fmt;
use std::path::Path;

use crate::config::ShellConfig;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::layout::HeaderLayout;
use crate::object::ObjectRef;
use crate::raster::{corner_radius, render_gradient_bar};
use crate::source::{PageGeometry, SourceDocument};
use crate::writer::{placement, ImageData, ImageError, PageBuilder, PageImporter, PdfWriter};

/// Why an element was left off a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The image asset could not be read or decoded
    Asset(String),
    /// The element's rectangle has no positive area
    DegenerateGeometry,
    /// The element is not configured (no path, empty text)
    NotConfigured,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Asset(reason) => write!(f, "asset unavailable: {}", reason),
            SkipReason::DegenerateGeometry => write!(f, "no room on page"),
            SkipReason::NotConfigured => write!(f, "not configured"),
        }
    }
}

/// What happened to one shell element on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    /// Drawn on the page
    Placed,
    /// Left off the page
    Skipped(SkipReason),
}

impl ElementOutcome {
    /// True for [`ElementOutcome::Placed`].
    pub fn is_placed(&self) -> bool {
        matches!(self, ElementOutcome::Placed)
    }
}

/// Outcome of every shell element on one output page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationReport {
    /// Zero-based page index, same in source and output
    pub page_index: usize,
    /// Header icon
    pub icon: ElementOutcome,
    /// Header logo
    pub logo: ElementOutcome,
    /// Header title
    pub title: ElementOutcome,
    /// Gradient bar bitmap
    pub gradient_bar: ElementOutcome,
    /// Text over the bar
    pub bar_label: ElementOutcome,
    /// Icon over the bar
    pub bar_icon: ElementOutcome,
    /// Content frame border
    pub border: ElementOutcome,
    /// Embedded source page
    pub content: ElementOutcome,
}

impl DecorationReport {
    fn new(page_index: usize) -> Self {
        let pending = || ElementOutcome::Skipped(SkipReason::NotConfigured);
        Self {
            page_index,
            icon: pending(),
            logo: pending(),
            title: pending(),
            gradient_bar: pending(),
            bar_label: pending(),
            bar_icon: pending(),
            border: pending(),
            content: pending(),
        }
    }

    /// Every element, labelled, in drawing order.
    pub fn elements(&self) -> [(&'static str, &ElementOutcome); 8] {
        [
            ("icon", &self.icon),
            ("logo", &self.logo),
            ("title", &self.title),
            ("gradient_bar", &self.gradient_bar),
            ("bar_label", &self.bar_label),
            ("bar_icon", &self.bar_icon),
            ("border", &self.border),
            ("content", &self.content),
        ]
    }

    /// True when nothing was skipped.
    pub fn all_placed(&self) -> bool {
        self.elements().iter().all(|(_, outcome)| outcome.is_placed())
    }

    /// The skipped elements and why.
    pub fn skipped(&self) -> Vec<(&'static str, &SkipReason)> {
        self.elements()
            .into_iter()
            .filter_map(|(name, outcome)| match outcome {
                ElementOutcome::Skipped(reason) => Some((name, reason)),
                ElementOutcome::Placed => None,
            })
            .collect()
    }
}

/// An image already written to the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Image XObject
    pub object: ObjectRef,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A decorative image slot: embedded, or the reason it is unavailable.
pub type Asset = std::result::Result<EmbeddedImage, SkipReason>;

/// The decorative images shared by every page of one build.
#[derive(Debug, Clone)]
pub struct ShellAssets {
    /// Header icon
    pub icon: Asset,
    /// Header logo
    pub logo: Asset,
    /// Bar icon
    pub bar_icon: Asset,
}

impl ShellAssets {
    /// Decode and embed the images once. Failures are kept as skip reasons.
    pub fn load(
        writer: &mut PdfWriter,
        icon: &Path,
        logo: &Path,
        bar_icon: Option<&Path>,
    ) -> Self {
        Self {
            icon: embed_asset(writer, "icon", ImageData::from_file(icon)),
            logo: embed_asset(writer, "logo", ImageData::from_file(logo)),
            bar_icon: match bar_icon {
                Some(path) => embed_asset(writer, "bar icon", ImageData::from_file(path)),
                None => Err(SkipReason::NotConfigured),
            },
        }
    }

    /// Same as [`ShellAssets::load`] for images held in memory.
    pub fn from_bytes(
        writer: &mut PdfWriter,
        icon: &[u8],
        logo: &[u8],
        bar_icon: Option<&[u8]>,
    ) -> Self {
        Self {
            icon: embed_asset(writer, "icon", ImageData::from_bytes(icon)),
            logo: embed_asset(writer, "logo", ImageData::from_bytes(logo)),
            bar_icon: match bar_icon {
                Some(bytes) => embed_asset(writer, "bar icon", ImageData::from_bytes(bytes)),
                None => Err(SkipReason::NotConfigured),
            },
        }
    }

    /// Replace the bar icon with the image at `path`.
    pub fn load_bar_icon(&mut self, writer: &mut PdfWriter, path: &Path) {
        self.bar_icon = embed_asset(writer, "bar icon", ImageData::from_file(path));
    }
}

fn embed_asset(
    writer: &mut PdfWriter,
    name: &str,
    image: std::result::Result<ImageData, ImageError>,
) -> Asset {
    match image {
        Ok(image) => Ok(EmbeddedImage {
            object: writer.add_image(&image),
            width: image.width,
            height: image.height,
        }),
        Err(e) => {
            log::warn!("Could not load {} image: {}", name, e);
            Err(SkipReason::Asset(e.to_string()))
        },
    }
}

/// Renders shell pages into a [`PdfWriter`].
#[derive(Debug, Clone, Copy)]
pub struct PageShellCompositor<'a> {
    config: &'a ShellConfig,
    title: &'a str,
}

impl<'a> PageShellCompositor<'a> {
    /// Create a compositor drawing `title` in the header.
    pub fn new(config: &'a ShellConfig, title: &'a str) -> Self {
        Self { config, title }
    }

    /// Append the shell page for `geometry` to `writer`.
    ///
    /// The output page has exactly the source page's displayed size. Only a
    /// failure to embed the source page content is an error.
    pub fn render_page(
        &self,
        writer: &mut PdfWriter,
        importer: &mut PageImporter,
        source: &SourceDocument,
        geometry: &PageGeometry,
        assets: &ShellAssets,
    ) -> Result<DecorationReport> {
        let config = self.config;
        let layout = HeaderLayout::plan(geometry.width, geometry.height, config);
        let mut report = DecorationReport::new(geometry.index);
        let body_fits = layout.body_fits();
        let bar_fits = layout.bar_fits();

        // Objects the page will reference are written before the page
        // builder borrows the writer.
        let bar_image = if bar_fits {
            Some(gradient_image(&layout.bar, config).map(|image| writer.add_image(&image)))
        } else {
            None
        };
        let content = if body_fits {
            let form = importer.import_page(source, geometry.index, writer)?;
            placement(geometry, layout.content, geometry.height).map(|m| (form, m))
        } else {
            None
        };

        let mut page = writer.add_page(geometry.width, geometry.height);

        report.icon = place_image(&mut page, &assets.icon, layout.icon);
        report.logo = place_image(&mut page, &assets.logo, layout.logo);

        report.title = if self.title.is_empty() {
            ElementOutcome::Skipped(SkipReason::NotConfigured)
        } else {
            page.draw_text(
                &config.font,
                config.title_font_size,
                config.title_color,
                self.title,
                layout.title_anchor,
            );
            ElementOutcome::Placed
        };

        if bar_fits {
            let bar = layout.bar;
            report.gradient_bar = match bar_image {
                Some(Ok(image)) => {
                    page.draw_image(image, bar);
                    ElementOutcome::Placed
                },
                Some(Err(reason)) => ElementOutcome::Skipped(reason),
                None => ElementOutcome::Skipped(SkipReason::DegenerateGeometry),
            };

            report.bar_label = if config.bar_label.is_empty() {
                ElementOutcome::Skipped(SkipReason::NotConfigured)
            } else {
                let anchor = Point::new(
                    bar.x + config.bar_label_offset_x,
                    bar.y + bar.height * config.bar_label_baseline_ratio,
                );
                page.draw_text(
                    &config.font,
                    config.bar_label_font_size,
                    config.bar_label_color,
                    &config.bar_label,
                    anchor,
                );
                ElementOutcome::Placed
            };

            let side = (bar.height - config.bar_icon_padding).min(config.bar_icon_max_size);
            let icon_rect = Rect::new(
                bar.x + config.bar_icon_inset,
                bar.y + (bar.height - side) / 2.0,
                side,
                side,
            );
            report.bar_icon = place_image(&mut page, &assets.bar_icon, icon_rect);
        } else {
            let skipped = || ElementOutcome::Skipped(SkipReason::DegenerateGeometry);
            report.gradient_bar = skipped();
            report.bar_label = skipped();
            report.bar_icon = skipped();
        }

        if body_fits {
            page.stroke_rect(layout.content, config.border_color, config.border_width);
            report.border = ElementOutcome::Placed;

            report.content = match content {
                Some((form, matrices)) => {
                    page.draw_form(form, &matrices);
                    ElementOutcome::Placed
                },
                None => ElementOutcome::Skipped(SkipReason::DegenerateGeometry),
            };
        } else {
            report.border = ElementOutcome::Skipped(SkipReason::DegenerateGeometry);
            report.content = ElementOutcome::Skipped(SkipReason::DegenerateGeometry);
        }

        page.finish();

        for (name, reason) in report.skipped() {
            if *reason != SkipReason::NotConfigured {
                log::warn!("Page {}: skipped {} ({})", geometry.index, name, reason);
            }
        }
        log::debug!("Rendered shell page {}", geometry.index);

        Ok(report)
    }
}

/// Widest gradient bitmap; wider bars are stretched by the image matrix.
const MAX_BAR_WIDTH_PX: u32 = 4096;
/// Tallest gradient bitmap.
const MAX_BAR_HEIGHT_PX: u32 = 512;

/// Rasterize the bar at one pixel per point, up to the bitmap limits.
fn gradient_image(bar: &Rect, config: &ShellConfig) -> std::result::Result<ImageData, SkipReason> {
    // Fractional points are truncated, as a pixel grid would.
    let width = (bar.width as u32).min(MAX_BAR_WIDTH_PX);
    let height = (bar.height as u32).min(MAX_BAR_HEIGHT_PX);
    if width == 0 || height == 0 {
        return Err(SkipReason::DegenerateGeometry);
    }

    let radius = corner_radius(height, config.corner_radius_cap);
    let bitmap = render_gradient_bar(
        width,
        height,
        config.gradient_start,
        config.gradient_end,
        radius,
    );
    ImageData::from_rgba(bitmap.as_image()).map_err(|e| SkipReason::Asset(e.to_string()))
}

fn place_image(page: &mut PageBuilder<'_>, asset: &Asset, rect: Rect) -> ElementOutcome {
    let image = match asset {
        Ok(image) => image,
        Err(reason) => return ElementOutcome::Skipped(reason.clone()),
    };
    match rect.fit_centered(image.width as f32, image.height as f32) {
        Some(fitted) => {
            page.draw_image(image.object, fitted);
            ElementOutcome::Placed
        },
        None => ElementOutcome::Skipped(SkipReason::DegenerateGeometry),
    }
}
