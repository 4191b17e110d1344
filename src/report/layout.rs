//! Declarative table layout.
//!
//! Every report table is described by a [`TableLayout`] (position, columns
//! with relative weights, row heights and colours) and drawn by the single
//! routine [`draw_table`], which also handles page breaks.

use super::canvas::{Align, PdfCanvas, Rgb};
use super::fonts::{FontStyle, PT_PER_MM};

/// Lowest baseline a table row may extend to before a page break.
pub const PAGE_BOTTOM_LIMIT_MM: f64 = 270.0;
/// Where content resumes on a continuation page.
pub const CONTINUATION_TOP_MM: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub header: String,
    pub weight: f64,
    pub align: Align,
}

impl ColumnSpec {
    pub fn new(header: impl Into<String>, weight: f64, align: Align) -> Self {
        Self {
            header: header.into(),
            weight,
            align,
        }
    }

    pub fn centered(header: impl Into<String>, weight: f64) -> Self {
        Self::new(header, weight, Align::Center)
    }
}

#[derive(Debug, Clone)]
pub struct TableStyle {
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub border: Rgb,
    pub body_fill: Option<Rgb>,
    /// Fill for every second body row.
    pub zebra: Option<Rgb>,
    pub emphasis_fill: Option<Rgb>,
    /// Draw vertical separators between columns.
    pub column_rules: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_fill: Rgb(240, 249, 255),
            header_text: Rgb(50, 50, 80),
            border: Rgb(180, 200, 230),
            body_fill: Some(Rgb::WHITE),
            zebra: None,
            emphasis_fill: None,
            column_rules: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableLayout {
    pub x: f64,
    pub width: f64,
    pub columns: Vec<ColumnSpec>,
    pub header_height: f64,
    pub row_height: f64,
    pub header_font_size: f64,
    pub body_font_size: f64,
    /// Horizontal inset for left/right aligned cells.
    pub padding: f64,
    pub style: TableStyle,
}

impl TableLayout {
    pub fn new(x: f64, width: f64, columns: Vec<ColumnSpec>) -> Self {
        Self {
            x,
            width,
            columns,
            header_height: 10.0,
            row_height: 8.0,
            header_font_size: 10.0,
            body_font_size: 10.0,
            padding: 2.0,
            style: TableStyle::default(),
        }
    }

    pub fn with_heights(mut self, header_height: f64, row_height: f64) -> Self {
        self.header_height = header_height;
        self.row_height = row_height;
        self
    }

    pub fn with_font_sizes(mut self, header: f64, body: f64) -> Self {
        self.header_font_size = header;
        self.body_font_size = body;
        self
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Absolute column widths, proportional to the weights.
    pub fn column_widths(&self) -> Vec<f64> {
        let total: f64 = self.columns.iter().map(|c| c.weight).sum();
        if total <= 0.0 {
            let even = self.width / self.columns.len().max(1) as f64;
            return vec![even; self.columns.len()];
        }
        self.columns
            .iter()
            .map(|c| self.width * c.weight / total)
            .collect()
    }

    /// Left edge of every column.
    pub fn column_offsets(&self) -> Vec<f64> {
        let mut x = self.x;
        self.column_widths()
            .into_iter()
            .map(|w| {
                let left = x;
                x += w;
                left
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    #[default]
    Plain,
    /// Totals: bold text and the emphasis fill.
    Emphasis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub style: RowStyle,
}

impl TableRow {
    pub fn plain<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            style: RowStyle::Plain,
        }
    }

    pub fn emphasis<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            style: RowStyle::Emphasis,
        }
    }
}

fn baseline(top: f64, height: f64, font_size: f64) -> f64 {
    top + height / 2.0 + font_size / PT_PER_MM * 0.35
}

fn cell_anchor(left: f64, width: f64, align: Align, padding: f64) -> f64 {
    match align {
        Align::Left => left + padding,
        Align::Center => left + width / 2.0,
        Align::Right => left + width - padding,
    }
}

fn draw_header(canvas: &mut PdfCanvas, layout: &TableLayout, y: f64) {
    let style = &layout.style;
    canvas.rect(
        layout.x,
        y,
        layout.width,
        layout.header_height,
        Some(style.header_fill),
        Some(style.border),
    );

    let widths = layout.column_widths();
    let offsets = layout.column_offsets();
    canvas.set_font(FontStyle::Bold, layout.header_font_size);
    canvas.set_text_color(style.header_text);
    let text_y = baseline(y, layout.header_height, layout.header_font_size);
    for (index, column) in layout.columns.iter().enumerate() {
        if style.column_rules && index > 0 {
            canvas.line(offsets[index], y, offsets[index], y + layout.header_height, style.border);
        }
        let anchor = cell_anchor(offsets[index], widths[index], column.align, layout.padding);
        canvas.text(anchor, text_y, &column.header, column.align);
    }
    canvas.set_text_color(Rgb::BLACK);
}

fn draw_row(canvas: &mut PdfCanvas, layout: &TableLayout, row: &TableRow, index: usize, y: f64) {
    let style = &layout.style;
    let fill = match row.style {
        RowStyle::Emphasis => style.emphasis_fill.or(style.body_fill),
        RowStyle::Plain if index % 2 == 1 => style.zebra.or(style.body_fill),
        RowStyle::Plain => style.body_fill,
    };
    canvas.rect(layout.x, y, layout.width, layout.row_height, fill, Some(style.border));

    let widths = layout.column_widths();
    let offsets = layout.column_offsets();
    let font = match row.style {
        RowStyle::Emphasis => FontStyle::Bold,
        RowStyle::Plain => FontStyle::Regular,
    };
    canvas.set_font(font, layout.body_font_size);
    let text_y = baseline(y, layout.row_height, layout.body_font_size);
    for (col, column) in layout.columns.iter().enumerate() {
        if style.column_rules && col > 0 {
            canvas.line(offsets[col], y, offsets[col], y + layout.row_height, style.border);
        }
        if let Some(text) = row.cells.get(col) {
            let anchor = cell_anchor(offsets[col], widths[col], column.align, layout.padding);
            canvas.text(anchor, text_y, text, column.align);
        }
    }
}

/// Draw a table whose header row starts at `y` and return the y just below
/// the last row. Rows that would pass [`PAGE_BOTTOM_LIMIT_MM`] continue on a
/// new page, which starts with the header row again.
pub fn draw_table(canvas: &mut PdfCanvas, layout: &TableLayout, rows: &[TableRow], y: f64) -> f64 {
    let mut y = y;
    let first_row = if rows.is_empty() { 0.0 } else { layout.row_height };
    if y + layout.header_height + first_row > PAGE_BOTTOM_LIMIT_MM {
        canvas.add_page();
        y = CONTINUATION_TOP_MM;
    }

    draw_header(canvas, layout, y);
    y += layout.header_height;

    for (index, row) in rows.iter().enumerate() {
        if y + layout.row_height > PAGE_BOTTOM_LIMIT_MM {
            canvas.add_page();
            y = CONTINUATION_TOP_MM;
            draw_header(canvas, layout, y);
            y += layout.header_height;
        }
        draw_row(canvas, layout, row, index, y);
        y += layout.row_height;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::canvas::DrawOp;

    fn layout() -> TableLayout {
        TableLayout::new(
            20.0,
            170.0,
            vec![
                ColumnSpec::centered("Status", 0.4),
                ColumnSpec::centered("Jumlah", 0.3),
                ColumnSpec::centered("%", 0.3),
            ],
        )
        .with_heights(12.0, 10.0)
    }

    fn texts(page: &[DrawOp]) -> Vec<&str> {
        page.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_column_widths_follow_weights() {
        let widths = layout().column_widths();
        assert!((widths[0] - 68.0).abs() < 1e-9);
        assert!((widths[1] - 51.0).abs() < 1e-9);
        assert!((widths.iter().sum::<f64>() - 170.0).abs() < 1e-9);
        assert_eq!(layout().column_offsets()[1], 88.0);
    }

    #[test]
    fn test_draw_table_returns_bottom() {
        let mut canvas = PdfCanvas::new();
        let rows = vec![
            TableRow::plain(["Hadir", "1", "25.0%"]),
            TableRow::emphasis(["Total", "4", "100%"]),
        ];
        let bottom = draw_table(&mut canvas, &layout(), &rows, 70.0);
        assert_eq!(bottom, 70.0 + 12.0 + 20.0);
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(texts(&canvas.pages()[0]), ["Status", "Jumlah", "%", "Hadir", "1", "25.0%", "Total", "4", "100%"]);
    }

    #[test]
    fn test_emphasis_row_is_bold() {
        let mut canvas = PdfCanvas::new();
        draw_table(&mut canvas, &layout(), &[TableRow::emphasis(["Total", "0", "0.0%"])], 70.0);
        let bold_total = canvas.pages()[0].iter().any(|op| {
            matches!(op, DrawOp::Text { text, style: FontStyle::Bold, .. } if text == "Total")
        });
        assert!(bold_total);
    }

    #[test]
    fn test_pagination_redraws_header() {
        let mut canvas = PdfCanvas::new();
        let rows: Vec<_> = (0..40)
            .map(|i| TableRow::plain([format!("Siswa {i}"), i.to_string(), "0.0%".to_string()]))
            .collect();

        let bottom = draw_table(&mut canvas, &layout(), &rows, 70.0);

        assert_eq!(canvas.page_count(), 2);
        // 70 + 12 header, 18 rows fit before 270
        let first = texts(&canvas.pages()[0]);
        assert_eq!(first.iter().filter(|t| **t == "Status").count(), 1);
        assert!(first.contains(&"Siswa 17"));
        assert!(!first.contains(&"Siswa 18"));

        let second = texts(&canvas.pages()[1]);
        assert_eq!(&second[..3], &["Status", "Jumlah", "%"]);
        assert_eq!(second[3], "Siswa 18");
        assert_eq!(bottom, CONTINUATION_TOP_MM + 12.0 + 22.0 * 10.0);
    }

    #[test]
    fn test_table_starting_too_low_moves_to_next_page() {
        let mut canvas = PdfCanvas::new();
        draw_table(&mut canvas, &layout(), &[TableRow::plain(["Hadir", "1", "100.0%"])], 255.0);
        assert_eq!(canvas.page_count(), 2);
        assert!(canvas.pages()[0].is_empty());
    }

    #[test]
    fn test_zebra_fill_alternates() {
        let style = TableStyle {
            zebra: Some(Rgb(240, 240, 240)),
            ..TableStyle::default()
        };
        let layout = layout().with_style(style);
        let mut canvas = PdfCanvas::new();
        let rows = vec![TableRow::plain(["a"]), TableRow::plain(["b"]), TableRow::plain(["c"])];
        draw_table(&mut canvas, &layout, &rows, 20.0);

        let fills: Vec<_> = canvas.pages()[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { fill, .. } => *fill,
                _ => None,
            })
            .skip(1)
            .collect();
        assert_eq!(fills, [Rgb::WHITE, Rgb(240, 240, 240), Rgb::WHITE]);
    }
}
