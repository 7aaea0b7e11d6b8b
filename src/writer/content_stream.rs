//! PDF content stream builder.
//!
//! Builds PDF content streams containing graphics and text operators
//! according to PDF specification ISO 32000-1:2008 Section 8-9.
//!
//! Coordinates given to the builder are already in PDF user space
//! (bottom-left origin); flipping from the layout's top-left space is the
//! page builder's job.

use crate::color::Color;
use crate::error::Result;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show text (Tj), already encoded for the font
    ShowText(Vec<u8>),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Show `text` with its baseline origin at `(x, y)`.
    ///
    /// The text is encoded with WinAnsiEncoding; characters outside it are
    /// replaced by `?`. The fill color is scoped to the text run.
    pub fn text(
        &mut self,
        font_resource: &str,
        size: f32,
        color: Color,
        text: &str,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        self.begin_text();
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b));
        self.op(ContentStreamOp::SetFont(font_resource.to_string(), size));
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowText(encode_win_ansi(text)));
        self.end_text();
        self.op(ContentStreamOp::RestoreState)
    }

    /// Draw an image XObject stretched over `(x, y, width, height)`.
    ///
    /// `(x, y)` is the lower-left corner.
    pub fn draw_image(
        &mut self,
        resource_id: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        self.op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y));
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.op(ContentStreamOp::RestoreState)
    }

    /// Paint a form XObject after concatenating each matrix in `transforms`.
    ///
    /// Matrices are emitted in order, so the last one is applied to form
    /// coordinates first.
    pub fn draw_form(&mut self, resource_id: &str, transforms: &[[f32; 6]]) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        for &[a, b, c, d, e, f] in transforms {
            self.op(ContentStreamOp::Transform(a, b, c, d, e, f));
        }
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.op(ContentStreamOp::RestoreState)
    }

    /// Stroke the outline of a rectangle with `(x, y)` as lower-left corner.
    pub fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        line_width: f32,
    ) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        self.op(ContentStreamOp::SetStrokeColorRGB(color.r, color.g, color.b));
        self.op(ContentStreamOp::SetLineWidth(line_width));
        self.op(ContentStreamOp::Rectangle(x, y, width, height));
        self.op(ContentStreamOp::Stroke);
        self.op(ContentStreamOp::RestoreState)
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }

        Ok(buf)
    }
}

/// Write a single operation to the buffer.
fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, size),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
        },
        ContentStreamOp::ShowText(bytes) => {
            write!(w, "(")?;
            write_escaped_string(w, bytes)?;
            write!(w, ") Tj")
        },
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", r, g, b),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => write!(w, "{} {} {} RG", r, g, b),
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", width),
        ContentStreamOp::Rectangle(x, y, w_val, h) => {
            write!(w, "{} {} {} {} re", x, y, w_val, h)
        },
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

/// Write an escaped PDF literal string body; bytes outside printable ASCII
/// use octal escapes.
fn write_escaped_string<W: Write>(w: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    for &byte in bytes {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            0x20..=0x7E => w.write_all(&[byte])?,
            _ => write!(w, "\\{:03o}", byte)?,
        }
    }
    Ok(())
}

/// Encode text for a standard Type1 font with WinAnsiEncoding.
///
/// Latin-1 maps one to one; the typographic characters WinAnsi places in
/// 0x80-0x9F are translated; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => ch as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(builder: &ContentStreamBuilder) -> String {
        String::from_utf8_lossy(&builder.build().unwrap()).to_string()
    }

    #[test]
    fn test_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("F1", 20.0, Color::black(), "CRUZEIRO", 95.0, 730.0);

        let content = built(&builder);
        assert_eq!(
            content,
            "q\nBT\n0 0 0 rg\n/F1 20 Tf\n1 0 0 1 95 730 Tm\n(CRUZEIRO) Tj\nET\nQ\n"
        );
    }

    #[test]
    fn test_text_color_does_not_reach_later_form() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("F1", 14.0, Color::white(), "Dados", 90.0, 670.0);
        builder.draw_form("Fm1", &[[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]);

        // Every q/Q pair is balanced before the form is painted.
        let ops = builder.operations();
        let form_at = ops
            .iter()
            .position(|op| *op == ContentStreamOp::PaintXObject("Fm1".to_string()))
            .unwrap();
        let mut depth = 0i32;
        let mut fill_at_depth_zero = false;
        for op in &ops[..form_at] {
            match op {
                ContentStreamOp::SaveState => depth += 1,
                ContentStreamOp::RestoreState => depth -= 1,
                ContentStreamOp::SetFillColorRGB(..) if depth == 0 => fill_at_depth_zero = true,
                _ => {},
            }
        }
        assert!(!fill_at_depth_zero);
    }

    #[test]
    fn test_text_escapes_and_latin1() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("F1", 14.0, Color::white(), "Ação (1)", 90.0, 670.0);

        let content = builder.build().unwrap();
        let expected: &[u8] = b"(A\\347\\343o \\(1\\)) Tj";
        assert!(content.windows(expected.len()).any(|w| w == expected));
    }

    #[test]
    fn test_draw_image() {
        let mut builder = ContentStreamBuilder::new();
        builder.draw_image("Im1", 40.0, 720.0, 40.0, 40.0);

        assert_eq!(built(&builder), "q\n40 0 0 40 40 720 cm\n/Im1 Do\nQ\n");
    }

    #[test]
    fn test_draw_form_keeps_transform_order() {
        let mut builder = ContentStreamBuilder::new();
        builder.draw_form("Fm1", &[[0.5, 0.0, 0.0, 0.5, 40.0, 40.0], [1.0, 0.0, 0.0, 1.0, -10.0, -20.0]]);

        assert_eq!(
            built(&builder),
            "q\n0.5 0 0 0.5 40 40 cm\n1 0 0 1 -10 -20 cm\n/Fm1 Do\nQ\n"
        );
    }

    #[test]
    fn test_stroke_rect() {
        let mut builder = ContentStreamBuilder::new();
        builder.stroke_rect(40.0, 40.0, 520.0, 610.0, Color::gray(0.5), 0.5);

        assert_eq!(
            built(&builder),
            "q\n0.5 0.5 0.5 RG\n0.5 w\n40 40 520 610 re\nS\nQ\n"
        );
    }

    #[test]
    fn test_text_object_closed_before_graphics() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text();
        builder.draw_image("Im1", 0.0, 0.0, 1.0, 1.0);
        assert_eq!(builder.operations()[1], ContentStreamOp::EndText);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Dados"), b"Dados".to_vec());
        assert_eq!(encode_win_ansi("é€—"), vec![0xE9, 0x80, 0x97]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
