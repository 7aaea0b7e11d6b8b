//! # PDF Shell
//!
//! Re-renders every page of a PDF inside a branded "shell": a header row with
//! an icon, a logo and a title, a gradient bar with rounded top corners and a
//! label, and a bordered frame holding the original page scaled to fit.
//!
//! ## Pipeline
//!
//! ```text
//! SourceDocument (lopdf)
//!     ↓ per page, in order
//! HeaderLayout::plan          (pure geometry)
//! raster::render_gradient_bar (pure pixels)
//!     ↓
//! PageShellCompositor         (draws, reports skipped elements)
//!     ↓
//! PdfWriter::finish           (bytes)
//! ```
//!
//! Decorative elements are best-effort: a missing icon or a page too small
//! for the bar is recorded in a [`DecorationReport`] and logged, never an
//! error. Only an unreadable source, a page whose content cannot be embedded
//! or a serialization failure abort the build.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_shell::{ShellConfig, ShellDocumentBuilder};
//!
//! let builder = ShellDocumentBuilder::new(ShellConfig::default());
//! let output = builder.build_with_report("input.pdf", "icon.png", "logo.png", None)?;
//! for report in output.incomplete_pages() {
//!     eprintln!("page {}: {:?}", report.page_index, report.skipped());
//! }
//! std::fs::write("input_shell.pdf", &output.bytes)?;
//! # Ok::<(), pdf_shell::Error>(())
//! ```

// Error handling
pub mod error;

// Configuration and primitives
pub mod color;
pub mod config;
pub mod geometry;

// Layout and rasterization
pub mod layout;
pub mod raster;

// Document input/output
pub mod object;
pub mod source;
pub mod writer;

// Composition
pub mod builder;
pub mod compositor;

pub use builder::{ShellDocumentBuilder, ShellOutput};
pub use color::{Color, Rgb};
pub use compositor::{DecorationReport, ElementOutcome, PageShellCompositor, SkipReason};
pub use config::{ShellConfig, DEFAULT_BAR_LABEL, DEFAULT_TITLE};
pub use error::{Error, Result};
pub use layout::HeaderLayout;
pub use source::{PageGeometry, SourceDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_shell");
    }
}
