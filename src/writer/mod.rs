//! PDF writing module for generating the shell document.
//!
//! ## Architecture
//!
//! ```text
//! layout rects / images / source pages
//!     ↓
//! [PageBuilder] (top-left layout space → PDF user space)
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! Source pages enter through [`PageImporter`], which copies them into the
//! writer as Form XObjects.
//!
//! ## Example
//!
//! ```
//! use pdf_shell::color::Color;
//! use pdf_shell::geometry::{Point, Rect};
//! use pdf_shell::writer::PdfWriter;
//!
//! let mut writer = PdfWriter::new();
//! writer
//!     .add_page(612.0, 792.0)
//!     .draw_text("Helvetica", 20.0, Color::black(), "CRUZEIRO", Point::new(95.0, 70.0))
//!     .stroke_rect(Rect::new(40.0, 150.0, 532.0, 602.0), Color::gray(0.85), 0.5);
//! let bytes = writer.finish()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok::<(), pdf_shell::Error>(())
//! ```

mod content_stream;
mod image_handler;
mod object_serializer;
mod page_import;
mod pdf_writer;

pub use content_stream::{encode_win_ansi, ContentStreamBuilder, ContentStreamOp};
pub use image_handler::{ColorSpace, ImageData, ImageError, ImageFormat};
pub use object_serializer::ObjectSerializer;
pub use page_import::{placement, PageImporter};
pub use pdf_writer::{PageBuilder, PdfWriter, PdfWriterConfig};
