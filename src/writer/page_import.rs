//! Embedding source pages as Form XObjects.
//!
//! A source page becomes a form whose stream is the page's (decompressed)
//! content and whose `/Resources` are deep-copied from the source document.
//! Every indirect object reached from the resources is renumbered into the
//! output once; pages that share fonts or images share the copies too.

use super::pdf_writer::PdfWriter;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};
use crate::source::{resolve, PageGeometry, SourceDocument};
use lopdf::ObjectId;
use std::collections::HashMap;
use std::io::Write;

/// Copies pages of one source document into a [`PdfWriter`].
///
/// Use one importer per source document and output writer pair; the
/// renumbering cache is only valid for that pair.
#[derive(Debug, Default)]
pub struct PageImporter {
    /// Source object id -> output reference
    imported: HashMap<ObjectId, ObjectRef>,
    compress: bool,
}

impl PageImporter {
    /// Create an importer. `compress` controls FlateDecode on form streams.
    pub fn new(compress: bool) -> Self {
        Self {
            imported: HashMap::new(),
            compress,
        }
    }

    /// Number of source objects copied so far.
    pub fn imported_objects(&self) -> usize {
        self.imported.len()
    }

    /// Copy page `index` of `source` into `writer` as a Form XObject.
    pub fn import_page(
        &mut self,
        source: &SourceDocument,
        index: usize,
        writer: &mut PdfWriter,
    ) -> Result<ObjectRef> {
        let geometry = source.page_geometry(index)?;
        let page_id = source.page_id(index)?;
        let doc = source.document();

        let content = page_content(doc, page_id).map_err(|reason| Error::PageImport {
            page: index,
            reason,
        })?;

        let resources = match source.page_resources(index)? {
            Some(resources) => self.convert(doc, resources, writer),
            None => Object::Dictionary(HashMap::new()),
        };

        let [x0, y0, x1, y1] = geometry.media_box;
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Form".to_string()));
        dict.insert("FormType".to_string(), Object::Integer(1));
        dict.insert(
            "BBox".to_string(),
            Object::Array(vec![
                Object::Real(x0 as f64),
                Object::Real(y0 as f64),
                Object::Real(x1 as f64),
                Object::Real(y1 as f64),
            ]),
        );
        dict.insert("Resources".to_string(), resources);

        let data = if self.compress {
            dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            deflate(&content).map_err(|e| Error::PageImport {
                page: index,
                reason: e.to_string(),
            })?
        } else {
            content
        };

        let form = writer.add_object(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        });
        log::debug!(
            "Imported page {} as form {} ({} objects copied so far)",
            index,
            form,
            self.imported.len()
        );
        Ok(form)
    }

    fn import_reference(
        &mut self,
        doc: &lopdf::Document,
        id: ObjectId,
        writer: &mut PdfWriter,
    ) -> ObjectRef {
        if let Some(obj_ref) = self.imported.get(&id) {
            return *obj_ref;
        }

        // Registered before recursing so reference cycles terminate.
        let obj_ref = writer.reserve_object();
        self.imported.insert(id, obj_ref);

        let copied = match doc.get_object(id) {
            Ok(obj) if is_page_tree_node(doc, obj) => Object::Null,
            Ok(obj) => self.convert(doc, obj, writer),
            Err(e) => {
                log::warn!("Dangling reference {} {} R: {}", id.0, id.1, e);
                Object::Null
            },
        };
        writer.set_object(obj_ref, copied);
        obj_ref
    }

    fn convert(
        &mut self,
        doc: &lopdf::Document,
        obj: &lopdf::Object,
        writer: &mut PdfWriter,
    ) -> Object {
        use lopdf::Object as Lo;

        match obj {
            Lo::Null => Object::Null,
            Lo::Boolean(b) => Object::Boolean(*b),
            Lo::Integer(i) => Object::Integer(*i),
            Lo::Real(r) => Object::Real(f64::from(*r)),
            Lo::Name(name) => Object::Name(String::from_utf8_lossy(name).into_owned()),
            Lo::String(bytes, _) => Object::String(bytes.clone()),
            Lo::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.convert(doc, item, writer))
                    .collect(),
            ),
            Lo::Dictionary(dict) => Object::Dictionary(self.convert_dict(doc, dict, writer)),
            Lo::Stream(stream) => {
                let mut dict = self.convert_dict(doc, &stream.dict, writer);
                // Recomputed by the serializer.
                dict.remove("Length");
                Object::Stream {
                    dict,
                    data: bytes::Bytes::from(stream.content.clone()),
                }
            },
            Lo::Reference(id) => Object::Reference(self.import_reference(doc, *id, writer)),
        }
    }

    fn convert_dict(
        &mut self,
        doc: &lopdf::Document,
        dict: &lopdf::Dictionary,
        writer: &mut PdfWriter,
    ) -> HashMap<String, Object> {
        dict.iter()
            .map(|(key, value)| {
                (
                    String::from_utf8_lossy(key).into_owned(),
                    self.convert(doc, value, writer),
                )
            })
            .collect()
    }
}

/// Whether `obj` is a `/Page` or `/Pages` dictionary.
fn is_page_tree_node(doc: &lopdf::Document, obj: &lopdf::Object) -> bool {
    let Ok(dict) = obj.as_dict() else {
        return false;
    };
    match dict.get(b"Type").map(|t| resolve(doc, t)) {
        Ok(lopdf::Object::Name(name)) => name == b"Page" || name == b"Pages",
        _ => false,
    }
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Matrices that show an imported page inside `target`.
///
/// The page is scaled uniformly to fit, centered, and turned upright
/// according to its `/Rotate`. `target` is in top-left layout space on a
/// page `page_height` points tall; the returned matrices are in PDF user
/// space, to be concatenated in order. Returns `None` if either the page or
/// the target has no area.
pub fn placement(
    geometry: &PageGeometry,
    target: Rect,
    page_height: f32,
) -> Option<[[f32; 6]; 3]> {
    let placed = target.fit_centered(geometry.width, geometry.height)?;
    let scale = placed.width / geometry.width;
    let bottom_pdf = page_height - placed.bottom();

    let w = geometry.unrotated_width();
    let h = geometry.unrotated_height();
    let rotate = match geometry.rotation {
        90 => [0.0, -1.0, 1.0, 0.0, 0.0, w],
        180 => [-1.0, 0.0, 0.0, -1.0, w, h],
        270 => [0.0, 1.0, -1.0, 0.0, h, 0.0],
        _ => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };
    let [x0, y0, _, _] = geometry.media_box;

    Some([
        [scale, 0.0, 0.0, scale, placed.x, bottom_pdf],
        rotate,
        [1.0, 0.0, 0.0, 1.0, -x0, -y0],
    ])
}

/// Decoded page content. Streams of an array `/Contents` are joined with a
/// newline so tokens at stream boundaries stay separate.
fn page_content(doc: &lopdf::Document, page_id: ObjectId) -> std::result::Result<Vec<u8>, String> {
    let mut content = Vec::new();
    for (n, id) in doc.get_page_contents(page_id).into_iter().enumerate() {
        let stream = doc
            .get_object(id)
            .and_then(lopdf::Object::as_stream)
            .map_err(|e| format!("content stream {} {} R: {}", id.0, id.1, e))?;
        let data = stream
            .get_plain_content()
            .map_err(|e| format!("cannot decode content stream {} {} R: {}", id.0, id.1, e))?;
        if n > 0 {
            content.push(b'\n');
        }
        content.extend_from_slice(&data);
    }
    Ok(content)
}
