//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Pages are described in the layout's top-left coordinate space; the
//! [`PageBuilder`] flips every position into PDF user space before it
//! reaches the content stream.

use super::content_stream::ContentStreamBuilder;
use super::image_handler::ImageData;
use super::object_serializer::ObjectSerializer;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::object::{Object, ObjectRef};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Producer library
    pub producer: Option<String>,
    /// Whether to compress content streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some(crate::NAME.to_string()),
            producer: Some(format!("{} {}", crate::NAME, crate::VERSION)),
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, page content streams are compressed
    /// using FlateDecode (zlib/deflate) to reduce file size.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// A page being built.
pub struct PageBuilder<'a> {
    writer: &'a mut PdfWriter,
    page_index: usize,
}

impl<'a> PageBuilder<'a> {
    fn page(&mut self) -> &mut PageData {
        &mut self.writer.pages[self.page_index]
    }

    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.writer.pages[self.page_index].width
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.writer.pages[self.page_index].height
    }

    /// Draw an image XObject (see [`PdfWriter::add_image`]) stretched over
    /// `rect`.
    pub fn draw_image(&mut self, image: ObjectRef, rect: Rect) -> &mut Self {
        let page = self.page();
        let name = page.xobject_name("Im", image);
        let y = page.height - rect.bottom();
        page.content_builder
            .draw_image(&name, rect.x, y, rect.width, rect.height);
        self
    }

    /// Show `text` with its baseline starting at `origin`.
    pub fn draw_text(
        &mut self,
        font_name: &str,
        size: f32,
        color: Color,
        text: &str,
        origin: Point,
    ) -> &mut Self {
        let font_ref = self.writer.font_ref(font_name);
        let page = self.page();
        let resource = page.font_name(font_ref);
        let y = page.height - origin.y;
        page.content_builder
            .text(&resource, size, color, text, origin.x, y);
        self
    }

    /// Stroke the outline of `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) -> &mut Self {
        let page = self.page();
        let y = page.height - rect.bottom();
        page.content_builder
            .stroke_rect(rect.x, y, rect.width, rect.height, color, line_width);
        self
    }

    /// Paint a form XObject. `transforms` are PDF user-space matrices,
    /// concatenated in order.
    pub fn draw_form(&mut self, form: ObjectRef, transforms: &[[f32; 6]]) -> &mut Self {
        let page = self.page();
        let name = page.xobject_name("Fm", form);
        page.content_builder.draw_form(&name, transforms);
        self
    }

    /// Finish building this page and return to the writer.
    pub fn finish(self) -> &'a mut PdfWriter {
        let page = &mut self.writer.pages[self.page_index];
        page.content_builder.end_text();
        self.writer
    }
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    content_builder: ContentStreamBuilder,
    /// Resource name -> object, per resource category
    xobjects: BTreeMap<String, ObjectRef>,
    fonts: BTreeMap<String, ObjectRef>,
}

impl PageData {
    fn xobject_name(&mut self, prefix: &str, obj_ref: ObjectRef) -> String {
        Self::resource_name(&mut self.xobjects, prefix, obj_ref)
    }

    fn font_name(&mut self, obj_ref: ObjectRef) -> String {
        Self::resource_name(&mut self.fonts, "F", obj_ref)
    }

    fn resource_name(
        names: &mut BTreeMap<String, ObjectRef>,
        prefix: &str,
        obj_ref: ObjectRef,
    ) -> String {
        if let Some((name, _)) = names.iter().find(|(_, r)| **r == obj_ref) {
            return name.clone();
        }
        let taken = names.keys().filter(|k| k.starts_with(prefix)).count();
        let name = format!("{}{}", prefix, taken + 1);
        names.insert(name.clone(), obj_ref);
        name
    }

    fn resources(&self) -> Object {
        let to_dict = |names: &BTreeMap<String, ObjectRef>| {
            Object::Dictionary(
                names
                    .iter()
                    .map(|(name, r)| (name.clone(), Object::Reference(*r)))
                    .collect(),
            )
        };

        let mut resources = HashMap::new();
        resources.insert(
            "ProcSet".to_string(),
            Object::Array(vec![
                ObjectSerializer::name("PDF"),
                ObjectSerializer::name("Text"),
                ObjectSerializer::name("ImageB"),
                ObjectSerializer::name("ImageC"),
            ]),
        );
        if !self.fonts.is_empty() {
            resources.insert("Font".to_string(), to_dict(&self.fonts));
        }
        if !self.xobjects.is_empty() {
            resources.insert("XObject".to_string(), to_dict(&self.xobjects));
        }
        Object::Dictionary(resources)
    }
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, images and imported
/// forms. Objects are written in id order and dictionaries with sorted keys,
/// so identical input gives identical bytes.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    catalog_id: u32,
    pages_id: u32,
    /// Object ID counter
    next_obj_id: u32,
    /// Allocated objects (id -> object)
    objects: BTreeMap<u32, Object>,
    /// Font resources used (base font name -> object ref)
    fonts: HashMap<String, ObjectRef>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            catalog_id: 1,
            pages_id: 2,
            next_obj_id: 3,
            objects: BTreeMap::new(),
            fonts: HashMap::new(),
        }
    }

    /// Allocate a new object ID.
    fn alloc_obj_id(&mut self) -> u32 {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        id
    }

    /// Reserve an object number to be filled later with [`set_object`].
    ///
    /// Reservations never filled are written as `null`.
    ///
    /// [`set_object`]: PdfWriter::set_object
    pub fn reserve_object(&mut self) -> ObjectRef {
        ObjectRef::new(self.alloc_obj_id(), 0)
    }

    /// Store `obj` under a previously reserved reference.
    pub fn set_object(&mut self, obj_ref: ObjectRef, obj: Object) {
        self.objects.insert(obj_ref.id, obj);
    }

    /// Add an indirect object and return its reference.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = self.reserve_object();
        self.set_object(obj_ref, obj);
        obj_ref
    }

    /// Embed an image, together with its soft mask when it has one.
    pub fn add_image(&mut self, image: &ImageData) -> ObjectRef {
        let mask_ref = image
            .to_soft_mask_xobject()
            .map(|mask| self.add_object(mask));

        let mut xobject = image.to_xobject();
        if let (Some(mask_ref), Object::Stream { dict, .. }) = (mask_ref, &mut xobject) {
            dict.insert("SMask".to_string(), Object::Reference(mask_ref));
        }
        self.add_object(xobject)
    }

    /// Add a page with the given dimensions.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageBuilder<'_> {
        let page_index = self.pages.len();
        self.pages.push(PageData {
            width,
            height,
            content_builder: ContentStreamBuilder::new(),
            xobjects: BTreeMap::new(),
            fonts: BTreeMap::new(),
        });
        PageBuilder {
            writer: self,
            page_index,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a font reference, creating the font object if needed.
    fn font_ref(&mut self, font_name: &str) -> ObjectRef {
        if let Some(font_ref) = self.fonts.get(font_name) {
            return *font_ref;
        }

        let font_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Font")),
            ("Subtype", ObjectSerializer::name("Type1")),
            ("BaseFont", ObjectSerializer::name(font_name)),
            ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
        ]);

        let font_ref = self.add_object(font_obj);
        self.fonts.insert(font_name.to_string(), font_ref);
        font_ref
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let pages = std::mem::take(&mut self.pages);
        let mut page_refs = Vec::with_capacity(pages.len());

        for page_data in &pages {
            let raw_content = page_data
                .content_builder
                .build()
                .map_err(|e| Error::Serialize(e.to_string()))?;

            let mut content_dict = HashMap::new();
            let content_bytes = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(compressed) => {
                        content_dict
                            .insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
                        compressed
                    },
                    Err(e) => {
                        log::warn!("Content stream compression failed, writing it raw: {}", e);
                        raw_content
                    },
                }
            } else {
                raw_content
            };

            let content_ref = self.add_object(Object::Stream {
                dict: content_dict,
                data: bytes::Bytes::from(content_bytes),
            });

            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(ObjectRef::new(self.pages_id, 0))),
                (
                    "MediaBox",
                    ObjectSerializer::rect(
                        0.0,
                        0.0,
                        page_data.width as f64,
                        page_data.height as f64,
                    ),
                ),
                ("Contents", ObjectSerializer::reference(content_ref)),
                ("Resources", page_data.resources()),
            ]);
            page_refs.push(Object::Reference(self.add_object(page_obj)));
        }

        let pages_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Count", ObjectSerializer::integer(page_refs.len() as i64)),
            ("Kids", Object::Array(page_refs)),
        ]);
        self.objects.insert(self.pages_id, pages_obj);

        let catalog_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(ObjectRef::new(self.pages_id, 0))),
        ]);
        self.objects.insert(self.catalog_id, catalog_obj);

        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::String(text_string(title))));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        if let Some(producer) = &self.config.producer {
            info_entries.push(("Producer", ObjectSerializer::string(producer)));
        }
        let info_ref = self.add_object(ObjectSerializer::dict(info_entries));

        let mut output = Vec::new();
        self.write_document(&mut output, info_ref)
            .map_err(|e| Error::Serialize(e.to_string()))?;

        log::debug!(
            "Serialized {} pages, {} objects, {} bytes",
            pages.len(),
            self.next_obj_id - 1,
            output.len()
        );
        Ok(output)
    }

    fn write_document(&self, output: &mut Vec<u8>, info_ref: ObjectRef) -> std::io::Result<()> {
        let serializer = ObjectSerializer::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets = Vec::with_capacity(self.next_obj_id as usize);
        for id in 1..self.next_obj_id {
            xref_offsets.push(output.len());
            let obj = self.objects.get(&id).unwrap_or(&Object::Null);
            serializer.write_indirect(output, id, 0, obj)?;
        }

        // Write xref table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;

        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        // Write trailer
        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(self.next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(ObjectRef::new(self.catalog_id, 0))),
            ("Info", ObjectSerializer::reference(info_ref)),
        ]);

        writeln!(output, "trailer")?;
        serializer.write_object(output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an `/Info` text string: PDFDocEncoding-compatible ASCII as is,
/// anything else as UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn uncompressed() -> PdfWriter {
        PdfWriter::with_config(PdfWriterConfig::default().with_compress(false))
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = PdfWriter::new();
        writer.add_page(612.0, 792.0).finish();
        let bytes = writer.finish().unwrap();

        let content = as_text(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_text_is_flipped_into_pdf_space() {
        let mut writer = uncompressed();
        writer.add_page(600.0, 800.0).draw_text(
            "Helvetica",
            20.0,
            Color::black(),
            "CRUZEIRO",
            Point::new(95.0, 70.0),
        );

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/BaseFont /Helvetica"));
        assert!(content.contains("/Encoding /WinAnsiEncoding"));
        assert!(content.contains("/F1 20 Tf\n1 0 0 1 95 730 Tm\n(CRUZEIRO) Tj"));
    }

    #[test]
    fn test_image_with_soft_mask() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([4, 67, 111, 255]));
        img.put_pixel(0, 0, Rgba([4, 67, 111, 0]));
        let image = ImageData::from_rgba(&img).unwrap();

        let mut writer = uncompressed();
        let image_ref = writer.add_image(&image);
        writer
            .add_page(600.0, 800.0)
            .draw_image(image_ref, Rect::new(40.0, 100.0, 520.0, 50.0));

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/SMask "));
        assert!(content.contains("/XObject <</Im1 "));
        // Bottom edge of the bar sits at 800 - 150.
        assert!(content.contains("520 0 0 50 40 650 cm\n/Im1 Do"));
    }

    #[test]
    fn test_same_image_reuses_resource_name() {
        let image = ImageData::from_rgba(&RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])))
            .unwrap();
        let mut writer = uncompressed();
        let image_ref = writer.add_image(&image);
        {
            let mut page = writer.add_page(100.0, 100.0);
            page.draw_image(image_ref, Rect::new(0.0, 0.0, 10.0, 10.0));
            page.draw_image(image_ref, Rect::new(20.0, 0.0, 10.0, 10.0));
        }

        let content = as_text(&writer.finish().unwrap());
        assert!(!content.contains("/Im2"));
        assert_eq!(content.matches("/Im1 Do").count(), 2);
    }

    #[test]
    fn test_stroke_rect_flipped() {
        let mut writer = uncompressed();
        writer.add_page(600.0, 800.0).stroke_rect(
            Rect::from_points(40.0, 150.0, 560.0, 760.0),
            Color::gray(0.5),
            0.5,
        );

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("40 40 520 610 re\nS"));
    }

    #[test]
    fn test_pdf_with_metadata() {
        let config = PdfWriterConfig::default()
            .with_title("Test Document")
            .with_compress(false);

        let mut writer = PdfWriter::with_config(config);
        writer.add_page(612.0, 792.0).finish();

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Title (Test Document)"));
        assert!(content.contains("/Producer (pdf_shell "));
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        assert_eq!(text_string("Ação")[..2], [0xFE, 0xFF]);
        assert_eq!(text_string("CRUZEIRO"), b"CRUZEIRO".to_vec());
    }

    #[test]
    fn test_multiple_pages() {
        let mut writer = PdfWriter::new();
        writer.add_page(612.0, 792.0).finish();
        writer.add_page(595.0, 842.0).finish();
        assert_eq!(writer.page_count(), 2);

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Count 2"));
        assert!(content.contains("[0 0 612 792]"));
        assert!(content.contains("[0 0 595 842]"));
    }

    #[test]
    fn test_compressed_content_stream() {
        let mut writer = PdfWriter::new();
        writer.add_page(100.0, 100.0).draw_text(
            "Helvetica",
            12.0,
            Color::black(),
            "hidden",
            Point::new(10.0, 10.0),
        );

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(!content.contains("(hidden) Tj"));
    }

    #[test]
    fn test_unfilled_reservation_is_null() {
        let mut writer = uncompressed();
        let reserved = writer.reserve_object();
        writer.add_page(100.0, 100.0).finish();

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains(&format!("{} 0 obj\nnull\nendobj", reserved.id)));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = uncompressed();
        writer.add_page(100.0, 100.0).finish();
        let bytes = writer.finish().unwrap();
        let content = as_text(&bytes);

        let xref_at = content.find("xref\n").unwrap();
        let first_entry = content[xref_at..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        // Offsets count raw bytes; the lossy string differs after the binary marker.
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut writer = PdfWriter::new();
            writer.add_page(600.0, 800.0).draw_text(
                "Helvetica",
                20.0,
                Color::black(),
                "CRUZEIRO",
                Point::new(95.0, 70.0),
            );
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
