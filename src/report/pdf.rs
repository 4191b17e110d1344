//! PDF renderer.
//!
//! Every page layout is composed from the same parts: the school header,
//! the title block, one or more declarative tables and the signature block.

use crate::attendance::{AttendanceSummary, PeriodSummary, StudentAttendanceRow};

use super::canvas::{Align, PdfCanvas, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::common::{or_dash, truncate_name};
use super::fonts::FontStyle;
use super::layout::{draw_table, ColumnSpec, TableLayout, TableRow, TableStyle, CONTINUATION_TOP_MM};
use super::title::{downloaded_on, pdf_title_lines, signatories, summary_lines, Signatory};
use super::traits::Renderer;
use super::{ReportData, ReportError, ReportFormat, ReportKind};

const MARGIN_MM: f64 = 20.0;
const HEADER_RULE_Y: f64 = 40.0;
const TITLE_TOP_Y: f64 = 50.0;
const TITLE_SPACING: f64 = 8.0;
const SECTION_GAP: f64 = 10.0;
/// Space taken by the download line and both signatures.
const FOOTER_HEIGHT_MM: f64 = 63.0;
const FOOTER_BOTTOM_LIMIT_MM: f64 = PAGE_HEIGHT_MM - 12.0;

pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, data: &ReportData) -> Result<Vec<u8>, ReportError> {
        Ok(compose(data).finish()?)
    }
}

/// Lay out every page of the report without encoding it.
pub fn compose(data: &ReportData) -> PdfCanvas {
    let mut canvas = PdfCanvas::new();
    draw_school_header(&mut canvas, data);
    let title_bottom = draw_titles(&mut canvas, data);

    let end_y = match &data.kind {
        ReportKind::Monthly { .. } => draw_table(
            &mut canvas,
            &summary_table(),
            &summary_rows(&data.summary),
            70.0,
        ),
        ReportKind::Student { .. } => draw_table(
            &mut canvas,
            &summary_table(),
            &summary_rows(&data.summary),
            85.0,
        ),
        ReportKind::Class { .. } => {
            let y = draw_table(&mut canvas, &summary_table(), &summary_rows(&data.summary), 70.0);
            draw_table(
                &mut canvas,
                &student_table(),
                &student_rows(&data.students),
                y + SECTION_GAP,
            )
        }
        ReportKind::Comprehensive { .. } => draw_comprehensive(&mut canvas, data),
        ReportKind::MonthlyRecap { .. } => draw_table(
            &mut canvas,
            &recap_table(),
            &recap_rows(&data.students),
            title_bottom + 4.0,
        ),
    };

    draw_footer(&mut canvas, data, end_y);
    canvas
}

fn draw_school_header(canvas: &mut PdfCanvas, data: &ReportData) {
    let school = &data.school;
    canvas.set_text_color(Rgb::BLACK);
    canvas.set_font(FontStyle::Bold, 18.0);
    canvas.centered_text(20.0, &school.name);
    canvas.set_font(FontStyle::Bold, 13.0);
    canvas.centered_text(27.0, &school.address);
    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.centered_text(33.0, &format!("NPSN :  {}", school.npsn));

    canvas.set_line_width(0.5);
    canvas.line(MARGIN_MM, HEADER_RULE_Y, PAGE_WIDTH_MM - MARGIN_MM, HEADER_RULE_Y, Rgb::BLACK);
    canvas.set_line_width(0.2);
}

/// Returns the baseline of the last title line.
fn draw_titles(canvas: &mut PdfCanvas, data: &ReportData) -> f64 {
    let mut y = TITLE_TOP_Y;
    for (index, line) in pdf_title_lines(&data.kind).iter().enumerate() {
        y = TITLE_TOP_Y + TITLE_SPACING * index as f64;
        canvas.set_font(FontStyle::Bold, line.size);
        canvas.centered_text(y, &line.text);
    }
    y
}

fn summary_table() -> TableLayout {
    TableLayout::new(
        MARGIN_MM,
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
        vec![
            ColumnSpec::centered("Status", 0.4),
            ColumnSpec::centered("Jumlah", 0.3),
            ColumnSpec::centered("%", 0.3),
        ],
    )
    .with_heights(12.0, 10.0)
    .with_font_sizes(12.0, 11.0)
}

fn summary_rows(summary: &AttendanceSummary) -> Vec<TableRow> {
    summary_lines(summary)
        .into_iter()
        .map(|line| {
            let cells = [line.label.to_string(), line.count.to_string(), line.percent];
            if line.is_total {
                TableRow::emphasis(cells)
            } else {
                TableRow::plain(cells)
            }
        })
        .collect()
}

fn student_table() -> TableLayout {
    TableLayout::new(
        MARGIN_MM,
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
        vec![
            ColumnSpec::centered("Nama", 45.0),
            ColumnSpec::centered("Kelas", 25.0),
            ColumnSpec::centered("Hadir", 25.0),
            ColumnSpec::centered("Sakit", 25.0),
            ColumnSpec::centered("Izin", 25.0),
            ColumnSpec::centered("Alpha", 25.0),
        ],
    )
    .with_heights(10.0, 8.0)
    .with_font_sizes(10.0, 9.0)
}

fn student_rows(students: &[StudentAttendanceRow]) -> Vec<TableRow> {
    students
        .iter()
        .map(|s| {
            TableRow::plain([
                truncate_name(&s.name),
                or_dash(Some(s.class.as_str())),
                s.hadir.to_string(),
                s.sakit.to_string(),
                s.izin.to_string(),
                s.alpha.to_string(),
            ])
        })
        .collect()
}

fn weekly_table() -> TableLayout {
    TableLayout::new(
        MARGIN_MM,
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
        vec![
            ColumnSpec::centered("Minggu", 30.0),
            ColumnSpec::centered("Hadir", 25.0),
            ColumnSpec::centered("Sakit", 25.0),
            ColumnSpec::centered("Izin", 25.0),
            ColumnSpec::centered("Alpha", 25.0),
            ColumnSpec::centered("Total", 25.0),
        ],
    )
    .with_heights(10.0, 8.0)
    .with_font_sizes(10.0, 10.0)
}

fn weekly_rows(weeks: &[PeriodSummary]) -> Vec<TableRow> {
    weeks
        .iter()
        .map(|week| {
            let s = &week.summary;
            TableRow::plain([
                week.label.clone(),
                s.present.to_string(),
                s.sick.to_string(),
                s.permitted.to_string(),
                s.absent.to_string(),
                s.total.to_string(),
            ])
        })
        .collect()
}

fn recap_table() -> TableLayout {
    let style = TableStyle {
        header_fill: Rgb(144, 238, 144),
        header_text: Rgb::BLACK,
        border: Rgb::BLACK,
        body_fill: None,
        zebra: Some(Rgb(240, 240, 240)),
        emphasis_fill: Some(Rgb(200, 200, 200)),
        column_rules: true,
    };
    TableLayout::new(
        15.0,
        PAGE_WIDTH_MM - 30.0,
        vec![
            ColumnSpec::new("Nama Siswa", 50.0, Align::Left),
            ColumnSpec::new("NISN", 25.0, Align::Left),
            ColumnSpec::new("Kelas", 15.0, Align::Left),
            ColumnSpec::new("Hadir", 15.0, Align::Left),
            ColumnSpec::new("Sakit", 15.0, Align::Left),
            ColumnSpec::new("Izin", 15.0, Align::Left),
            ColumnSpec::new("Alpha", 15.0, Align::Left),
            ColumnSpec::new("Total", 15.0, Align::Left),
        ],
    )
    .with_heights(8.0, 7.0)
    .with_font_sizes(9.0, 8.0)
    .with_style(style)
}

fn recap_rows(students: &[StudentAttendanceRow]) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = students
        .iter()
        .map(|s| {
            TableRow::plain([
                truncate_name(&s.name),
                s.nisn.clone().unwrap_or_default(),
                s.class.clone(),
                s.hadir.to_string(),
                s.sakit.to_string(),
                s.izin.to_string(),
                s.alpha.to_string(),
                s.total().to_string(),
            ])
        })
        .collect();

    let totals = crate::attendance::totals(students);
    rows.push(TableRow::emphasis([
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        totals.present.to_string(),
        totals.sick.to_string(),
        totals.permitted.to_string(),
        totals.absent.to_string(),
        totals.total.to_string(),
    ]));
    rows
}

fn section_caption(canvas: &mut PdfCanvas, y: f64, text: &str) {
    canvas.set_font(FontStyle::Bold, 12.0);
    canvas.text(MARGIN_MM, y, text, Align::Left);
}

fn draw_comprehensive(canvas: &mut PdfCanvas, data: &ReportData) -> f64 {
    section_caption(canvas, 70.0, "1. Rekapitulasi Kehadiran Bulanan");
    let y = draw_table(canvas, &summary_table().with_heights(10.0, 8.0), &summary_rows(&data.summary), 75.0);

    let caption_y = y + SECTION_GAP;
    section_caption(canvas, caption_y, "2. Rekapitulasi Kehadiran Mingguan");
    draw_table(canvas, &weekly_table(), &weekly_rows(&data.weekly), caption_y + 5.0);

    canvas.add_page();
    let caption_y = CONTINUATION_TOP_MM;
    section_caption(canvas, caption_y, "3. Rekapitulasi Kehadiran Per Siswa");
    draw_table(canvas, &student_table(), &student_rows(&data.students), caption_y + 5.0)
}

fn draw_signatory(canvas: &mut PdfCanvas, signatory: &Signatory, x: f64, y: f64) {
    canvas.set_font(FontStyle::Regular, 10.0);
    for (index, line) in signatory.heading.iter().enumerate() {
        canvas.text(x, y + 5.0 * index as f64, line, Align::Center);
    }
    let name_y = y + 30.0;
    canvas.text(x, name_y, &signatory.name_line(), Align::Center);
    canvas.text(x, name_y + 5.0, &signatory.nip_line(), Align::Center);
}

/// Download date followed by the two signatures, starting below `y`.
fn draw_footer(canvas: &mut PdfCanvas, data: &ReportData, y: f64) {
    let mut y = y;
    if y + FOOTER_HEIGHT_MM > FOOTER_BOTTOM_LIMIT_MM {
        canvas.add_page();
        y = CONTINUATION_TOP_MM;
    }

    let download_y = y + 13.0;
    canvas.set_text_color(Rgb::BLACK);
    canvas.set_font(FontStyle::Regular, 11.0);
    canvas.centered_text(download_y, &downloaded_on(data));

    let signature_y = download_y + 15.0;
    let (left, right) = signatories(data);
    draw_signatory(canvas, &left, PAGE_WIDTH_MM / 4.0, signature_y);
    draw_signatory(canvas, &right, PAGE_WIDTH_MM / 4.0 * 3.0, signature_y);
}
