//! Whole-document shell builds.
//!
//! [`ShellDocumentBuilder`] walks the source pages in order, renders one
//! shell page for each and serializes the result. Output bytes only exist
//! once every page has been rendered; a fatal error leaves nothing behind.

use std::path::Path;

use crate::compositor::{DecorationReport, PageShellCompositor, ShellAssets};
use crate::config::{ShellConfig, DEFAULT_TITLE};
use crate::error::Result;
use crate::source::SourceDocument;
use crate::writer::{PageImporter, PdfWriter, PdfWriterConfig};

/// A finished shell document.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    /// The serialized PDF
    pub bytes: Vec<u8>,
    /// One report per page, in page order
    pub pages: Vec<DecorationReport>,
}

impl ShellOutput {
    /// Reports of the pages where something was skipped.
    pub fn incomplete_pages(&self) -> impl Iterator<Item = &DecorationReport> {
        self.pages.iter().filter(|report| !report.all_placed())
    }
}

/// Builds shell documents with one configuration.
///
/// # Examples
///
/// ```no_run
/// use pdf_shell::{ShellConfig, ShellDocumentBuilder};
///
/// let builder = ShellDocumentBuilder::new(ShellConfig::default());
/// let bytes = builder.build("ticket.pdf", "icon.png", "logo.png", Some("CRUZEIRO"))?;
/// std::fs::write("ticket_shell.pdf", bytes)?;
/// # Ok::<(), pdf_shell::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShellDocumentBuilder {
    config: ShellConfig,
}

impl ShellDocumentBuilder {
    /// Create a builder.
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Build the shell document for the PDF at `source`.
    ///
    /// `title` defaults to [`DEFAULT_TITLE`]. Missing icon or logo files
    /// only leave those elements off the pages.
    pub fn build(
        &self,
        source: impl AsRef<Path>,
        icon: impl AsRef<Path>,
        logo: impl AsRef<Path>,
        title: Option<&str>,
    ) -> Result<Vec<u8>> {
        Ok(self.build_with_report(source, icon, logo, title)?.bytes)
    }

    /// Like [`build`](Self::build), also returning per-page reports.
    pub fn build_with_report(
        &self,
        source: impl AsRef<Path>,
        icon: impl AsRef<Path>,
        logo: impl AsRef<Path>,
        title: Option<&str>,
    ) -> Result<ShellOutput> {
        let source = SourceDocument::open(source)?;
        let title = title.unwrap_or(DEFAULT_TITLE);
        let mut writer = self.writer(title);
        let assets = ShellAssets::load(
            &mut writer,
            icon.as_ref(),
            logo.as_ref(),
            self.config.bar_icon_path.as_deref(),
        );
        self.render(&source, writer, &assets, title)
    }

    /// Build from in-memory inputs.
    ///
    /// The bar icon, if any, is still read from
    /// [`ShellConfig::bar_icon_path`].
    pub fn build_from_bytes(
        &self,
        source: &[u8],
        icon: &[u8],
        logo: &[u8],
        title: Option<&str>,
    ) -> Result<ShellOutput> {
        let source = SourceDocument::from_bytes(source)?;
        let title = title.unwrap_or(DEFAULT_TITLE);
        let mut writer = self.writer(title);
        let mut assets = ShellAssets::from_bytes(&mut writer, icon, logo, None);
        if let Some(path) = &self.config.bar_icon_path {
            assets.load_bar_icon(&mut writer, path);
        }
        self.render(&source, writer, &assets, title)
    }

    fn writer(&self, title: &str) -> PdfWriter {
        PdfWriter::with_config(
            PdfWriterConfig::default()
                .with_title(title)
                .with_compress(self.config.compress),
        )
    }

    fn render(
        &self,
        source: &SourceDocument,
        mut writer: PdfWriter,
        assets: &ShellAssets,
        title: &str,
    ) -> Result<ShellOutput> {
        log::info!(
            "Building shell for {} ({} pages)",
            source.path().display(),
            source.page_count()
        );

        let compositor = PageShellCompositor::new(&self.config, title);
        let mut importer = PageImporter::new(self.config.compress);
        let mut pages = Vec::with_capacity(source.page_count());

        for index in 0..source.page_count() {
            let geometry = source.page_geometry(index)?;
            let report =
                compositor.render_page(&mut writer, &mut importer, source, &geometry, assets)?;
            pages.push(report);
        }

        let bytes = writer.finish()?;
        log::info!(
            "Built shell document: {} pages, {} bytes",
            pages.len(),
            bytes.len()
        );

        Ok(ShellOutput { bytes, pages })
    }
}
