//! Read access to the source PDF.
//!
//! The source document is loaded with `lopdf` and only ever read: the shell
//! builder asks it for page geometry and the page importer copies page
//! content out of it.

use crate::error::{Error, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};

/// US Letter, used when a page has no usable MediaBox.
const LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Upper bound on page tree depth and reference chains.
const MAX_DEPTH: usize = 64;

/// Size and orientation of one source page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Zero-based page index
    pub index: usize,
    /// Displayed width in points (after `/Rotate`)
    pub width: f32,
    /// Displayed height in points (after `/Rotate`)
    pub height: f32,
    /// Normalized MediaBox `[x0 y0 x1 y1]` in unrotated page space
    pub media_box: [f32; 4],
    /// Clockwise rotation: 0, 90, 180 or 270
    pub rotation: u16,
}

impl PageGeometry {
    /// MediaBox width before rotation.
    pub fn unrotated_width(&self) -> f32 {
        self.media_box[2] - self.media_box[0]
    }

    /// MediaBox height before rotation.
    pub fn unrotated_height(&self) -> f32 {
        self.media_box[3] - self.media_box[1]
    }
}

/// A parsed source PDF.
pub struct SourceDocument {
    doc: Document,
    path: PathBuf,
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("path", &self.path)
            .field("pages", &self.page_ids.len())
            .finish()
    }
}

impl SourceDocument {
    /// Open and parse the PDF at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| Error::SourceDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_document(doc, path.to_path_buf()))
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let path = PathBuf::from("<memory>");
        let doc = Document::load_mem(bytes).map_err(|e| Error::SourceDocument {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_document(doc, path))
    }

    /// Wrap an already loaded `lopdf` document.
    pub fn from_document(doc: Document, path: PathBuf) -> Self {
        let page_ids = doc.get_pages().into_values().collect::<Vec<_>>();
        log::debug!("Loaded {} with {} pages", path.display(), page_ids.len());
        Self {
            doc,
            path,
            page_ids,
        }
    }

    /// Path the document was loaded from (`<memory>` for byte input).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages, in page tree order.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Geometry of page `index`.
    pub fn page_geometry(&self, index: usize) -> Result<PageGeometry> {
        let page_id = self.page_id(index)?;

        let media_box = match inherited(&self.doc, page_id, b"MediaBox").and_then(|obj| {
            resolve(&self.doc, obj)
                .as_array()
                .ok()
                .and_then(|arr| parse_box(&self.doc, arr))
        }) {
            Some(media_box) => media_box,
            None => {
                log::warn!("Page {} has no usable MediaBox, assuming US Letter", index);
                LETTER
            },
        };

        let rotation = inherited(&self.doc, page_id, b"Rotate")
            .and_then(|obj| resolve(&self.doc, obj).as_i64().ok())
            .map(|degrees| normalize_rotation(index, degrees))
            .unwrap_or(0);

        let w = media_box[2] - media_box[0];
        let h = media_box[3] - media_box[1];
        let (width, height) = if rotation % 180 == 90 { (h, w) } else { (w, h) };

        Ok(PageGeometry {
            index,
            width,
            height,
            media_box,
            rotation,
        })
    }

    pub(crate) fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    pub(crate) fn document(&self) -> &Document {
        &self.doc
    }

    /// The page's `/Resources`, following inheritance.
    pub(crate) fn page_resources(&self, index: usize) -> Result<Option<&Object>> {
        let page_id = self.page_id(index)?;
        Ok(inherited(&self.doc, page_id, b"Resources"))
    }
}

/// Look `key` up on the page dictionary, then on its ancestors.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node: &Dictionary = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").ok()?;
        node = resolve(doc, parent).as_dict().ok()?;
    }
    None
}

/// Follow a chain of references; dangling ones resolve to `null`.
pub(crate) fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> &'a Object {
    static NULL: Object = Object::Null;
    for _ in 0..MAX_DEPTH {
        match obj {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => obj = target,
                Err(_) => return &NULL,
            },
            _ => return obj,
        }
    }
    &NULL
}

fn number(doc: &Document, obj: &Object) -> Option<f32> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(f64::from(*r) as f32),
        _ => None,
    }
}

/// Parse a rectangle array into `[x0 y0 x1 y1]` with `x0 < x1`, `y0 < y1`.
fn parse_box(doc: &Document, arr: &[Object]) -> Option<[f32; 4]> {
    if arr.len() < 4 {
        return None;
    }
    let a = number(doc, &arr[0])?;
    let b = number(doc, &arr[1])?;
    let c = number(doc, &arr[2])?;
    let d = number(doc, &arr[3])?;
    let media_box = [a.min(c), b.min(d), a.max(c), b.max(d)];
    let valid = media_box.iter().all(|v| v.is_finite())
        && media_box[2] > media_box[0]
        && media_box[3] > media_box[1];
    valid.then_some(media_box)
}

fn normalize_rotation(index: usize, degrees: i64) -> u16 {
    let normalized = degrees.rem_euclid(360);
    if normalized % 90 != 0 {
        log::warn!("Page {} has invalid /Rotate {}, ignoring it", index, degrees);
        return 0;
    }
    normalized as u16
}
