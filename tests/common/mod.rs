//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;

/// One source page: MediaBox size and optional `/Rotate`.
///
/// Pages built with [`FixturePage::new`] paint a background and a line of
/// text with explicit colors. Pages built with [`FixturePage::with_streams`]
/// use the given content streams verbatim, as an array when there are several.
pub struct FixturePage {
    pub width: i64,
    pub height: i64,
    pub rotate: Option<i64>,
    pub text: &'static str,
    pub streams: Vec<&'static str>,
}

impl FixturePage {
    pub fn new(width: i64, height: i64, text: &'static str) -> Self {
        Self {
            width,
            height,
            rotate: None,
            text,
            streams: Vec::new(),
        }
    }

    pub fn with_streams(width: i64, height: i64, streams: &[&'static str]) -> Self {
        Self {
            streams: streams.to_vec(),
            ..Self::new(width, height, "")
        }
    }

    pub fn rotated(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Serialize a PDF with the given pages, all sharing one font.
pub fn source_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let contents: Object = if page.streams.is_empty() {
            let content = format!(
                "0.2 0.4 0.6 rg\n0 0 {} {} re\nf\n0 0 0 rg\nBT\n/F1 18 Tf\n36 {} Td\n({}) Tj\nET\n",
                page.width,
                page.height,
                page.height - 40,
                page.text
            );
            doc.add_object(Stream::new(Dictionary::new(), content.into_bytes())).into()
        } else {
            let ids: Vec<Object> = page
                .streams
                .iter()
                .map(|s| doc.add_object(Stream::new(Dictionary::new(), s.as_bytes().to_vec())).into())
                .collect();
            if ids.len() == 1 {
                ids[0].clone()
            } else {
                Object::Array(ids)
            }
        };
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
        };
        if let Some(degrees) = page.rotate {
            page_dict.set("Rotate", degrees);
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture pdf");
    bytes
}

/// A solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)
        .expect("encode fixture png");
    out.into_inner()
}

/// Load an output PDF and list its pages in order.
pub fn load_output(bytes: &[u8]) -> (Document, Vec<ObjectId>) {
    let doc = Document::load_mem(bytes).expect("output parses");
    let pages = doc.get_pages().into_values().collect();
    (doc, pages)
}

/// Page size from the output page's MediaBox.
pub fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let page = doc.get_dictionary(page_id).expect("page dict");
    let arr = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("MediaBox");
    let mut out = [0.0; 4];
    for (slot, obj) in out.iter_mut().zip(arr) {
        *slot = match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r as f32,
            other => panic!("unexpected MediaBox entry {:?}", other),
        };
    }
    out
}

/// Decompressed page content as text.
pub fn page_content(doc: &Document, page_id: ObjectId) -> String {
    let bytes = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// The image XObjects drawn on a page, keyed by resource name.
pub fn page_images(doc: &Document, page_id: ObjectId) -> Vec<(String, Stream)> {
    page_xobjects(doc, page_id, b"Image")
}

/// The form XObjects drawn on a page, keyed by resource name.
pub fn page_forms(doc: &Document, page_id: ObjectId) -> Vec<(String, Stream)> {
    page_xobjects(doc, page_id, b"Form")
}

fn page_xobjects(doc: &Document, page_id: ObjectId, subtype: &[u8]) -> Vec<(String, Stream)> {
    let page = doc.get_dictionary(page_id).expect("page dict");
    let Ok(resources) = page.get(b"Resources").and_then(Object::as_dict) else {
        return Vec::new();
    };
    let Ok(xobjects) = resources.get(b"XObject").and_then(Object::as_dict) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for (name, obj) in xobjects.iter() {
        let id = obj.as_reference().expect("XObject reference");
        let stream = doc
            .get_object(id)
            .and_then(Object::as_stream)
            .expect("XObject stream");
        let matches = matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == subtype);
        if matches {
            found.push((String::from_utf8_lossy(name).into_owned(), stream.clone()));
        }
    }
    found
}

/// Fill color in effect at each `Do` of a content stream, tracking `q`/`Q`.
///
/// `None` means the initial (black) fill was never changed.
pub fn fill_at_each_do(content: &str) -> Vec<(String, Option<String>)> {
    let mut current: Option<String> = None;
    let mut saved = Vec::new();
    let mut out = Vec::new();
    for line in content.lines().map(str::trim) {
        if line == "q" {
            saved.push(current.clone());
        } else if line == "Q" {
            current = saved.pop().flatten();
        } else if let Some(color) = line.strip_suffix(" rg") {
            current = Some(color.to_string());
        } else if let Some(name) = line.strip_suffix(" Do") {
            out.push((name.trim_start_matches('/').to_string(), current.clone()));
        }
    }
    out
}

/// The image XObject with the given pixel size.
pub fn image_of_size(doc: &Document, page_id: ObjectId, width: i64, height: i64) -> Option<Stream> {
    page_images(doc, page_id)
        .into_iter()
        .map(|(_, stream)| stream)
        .find(|stream| {
            stream.dict.get(b"Width").and_then(Object::as_i64).ok() == Some(width)
                && stream.dict.get(b"Height").and_then(Object::as_i64).ok() == Some(height)
        })
}

/// Decoded samples of an image stream, with its soft mask if any.
pub fn image_samples(doc: &Document, image: &Stream) -> (Vec<u8>, Option<Vec<u8>>) {
    let samples = image.get_plain_content().expect("image samples");
    let mask = image
        .dict
        .get(b"SMask")
        .and_then(Object::as_reference)
        .ok()
        .map(|id| {
            doc.get_object(id)
                .and_then(Object::as_stream)
                .and_then(|s| s.get_plain_content())
                .expect("soft mask samples")
        });
    (samples, mask)
}
