//! Page canvas for A4 portrait reports.
//!
//! Coordinates are millimetres with the origin at the top-left corner, the
//! way report layouts are measured. Drawing calls are recorded per page as
//! [`DrawOp`]s and only turned into PDF content streams by [`PdfCanvas::finish`].

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};

use super::fonts::{encode_win_ansi, text_width_mm, FontStyle, PT_PER_MM};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    fn components(&self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .iter()
            .map(|c| Object::from(*c as f64 / 255.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its left baseline point at (x, y).
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        style: FontStyle,
        color: Rgb,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Rgb,
    },
}

pub struct PdfCanvas {
    pages: Vec<Vec<DrawOp>>,
    font_style: FontStyle,
    font_size: f64,
    text_color: Rgb,
    line_width: f64,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            font_style: FontStyle::Regular,
            font_size: 10.0,
            text_color: Rgb::BLACK,
            line_width: 0.2,
        }
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    pub fn set_font(&mut self, style: FontStyle, size: f64) {
        self.font_style = style;
        self.font_size = size;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Width of `text` in the current font.
    pub fn text_width(&self, text: &str) -> f64 {
        text_width_mm(text, self.font_style, self.font_size)
    }

    fn push(&mut self, op: DrawOp) {
        // pages is never empty
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    /// Draw text anchored at `x` according to `align`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, align: Align) {
        if text.is_empty() {
            return;
        }
        let left = match align {
            Align::Left => x,
            Align::Center => x - self.text_width(text) / 2.0,
            Align::Right => x - self.text_width(text),
        };
        self.push(DrawOp::Text {
            x: left,
            y,
            text: text.to_string(),
            size: self.font_size,
            style: self.font_style,
            color: self.text_color,
        });
    }

    /// Text centred on the page width.
    pub fn centered_text(&mut self, y: f64, text: &str) {
        self.text(PAGE_WIDTH_MM / 2.0, y, text, Align::Center);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Rgb>, stroke: Option<Rgb>) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width: self.line_width,
            color,
        });
    }

    /// Encode every page into a PDF document.
    pub fn finish(self) -> Result<Vec<u8>, lopdf::Error> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary(FontStyle::Regular));
        let bold_id = doc.add_object(font_dictionary(FontStyle::Bold));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FontStyle::Regular.resource_name() => regular_id,
                FontStyle::Bold.resource_name() => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content: Content<Vec<Operation>> = Content {
                operations: page.iter().flat_map(encode_op).collect(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::from(PAGE_WIDTH_MM * PT_PER_MM),
                Object::from(PAGE_HEIGHT_MM * PT_PER_MM),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn font_dictionary(style: FontStyle) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => style.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn pt(mm: f64) -> Object {
    Object::from(mm * PT_PER_MM)
}

/// PDF user space has its origin at the bottom-left.
fn pt_y(mm: f64) -> Object {
    Object::from((PAGE_HEIGHT_MM - mm) * PT_PER_MM)
}

fn encode_op(op: &DrawOp) -> Vec<Operation> {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            size,
            style,
            color,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new("rg", color.components()),
            Operation::new("Tf", vec![style.resource_name().into(), Object::from(*size)]),
            Operation::new("Td", vec![pt(*x), pt_y(*y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let paint = match (fill, stroke) {
                (Some(_), Some(_)) => "B",
                (Some(_), None) => "f",
                (None, Some(_)) => "S",
                (None, None) => return Vec::new(),
            };
            let mut ops = vec![Operation::new("q", vec![])];
            if let Some(fill) = fill {
                ops.push(Operation::new("rg", fill.components()));
            }
            if let Some(stroke) = stroke {
                ops.push(Operation::new("RG", stroke.components()));
                ops.push(Operation::new("w", vec![pt(0.2)]));
            }
            ops.push(Operation::new(
                "re",
                vec![pt(*x), pt_y(*y + *height), pt(*width), pt(*height)],
            ));
            ops.push(Operation::new(paint, vec![]));
            ops.push(Operation::new("Q", vec![]));
            ops
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("RG", color.components()),
            Operation::new("w", vec![pt(*width)]),
            Operation::new("m", vec![pt(*x1), pt_y(*y1)]),
            Operation::new("l", vec![pt(*x2), pt_y(*y2)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_text_is_symmetric() {
        let mut canvas = PdfCanvas::new();
        canvas.set_font(FontStyle::Bold, 18.0);
        canvas.centered_text(20.0, "SMP Negeri 1");

        let width = canvas.text_width("SMP Negeri 1");
        match &canvas.pages()[0][0] {
            DrawOp::Text { x, y, .. } => {
                assert!((x + width / 2.0 - PAGE_WIDTH_MM / 2.0).abs() < 1e-9);
                assert_eq!(*y, 20.0);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_right_aligned_text_ends_at_anchor() {
        let mut canvas = PdfCanvas::new();
        canvas.text(100.0, 50.0, "12", Align::Right);
        let width = canvas.text_width("12");
        match &canvas.pages()[0][0] {
            DrawOp::Text { x, .. } => assert!((x + width - 100.0).abs() < 1e-9),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_is_not_recorded() {
        let mut canvas = PdfCanvas::new();
        canvas.text(10.0, 10.0, "", Align::Left);
        assert!(canvas.pages()[0].is_empty());
    }

    #[test]
    fn test_finish_produces_pdf_with_every_page() {
        let mut canvas = PdfCanvas::new();
        canvas.text(20.0, 20.0, "Halaman 1", Align::Left);
        canvas.rect(20.0, 30.0, 170.0, 10.0, Some(Rgb(240, 249, 255)), Some(Rgb(180, 200, 230)));
        canvas.add_page();
        canvas.line(20.0, 40.0, 190.0, 40.0, Rgb::BLACK);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
