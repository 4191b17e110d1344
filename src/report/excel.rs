//! Spreadsheet renderer.
//!
//! Reports are first described as plain [`SheetData`] (rows of typed cells)
//! and then written with `rust_xlsxwriter`. Counts are native numbers,
//! percentages are pre-formatted strings.

use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};

use crate::attendance::{totals, AttendanceStatus, StudentAttendanceRow};

use super::common::{format_indonesian_date, sanitize_sheet_name};
use super::title::{downloaded_on, sheet_title_lines, signatories, summary_lines};
use super::traits::Renderer;
use super::{ReportData, ReportError, ReportFormat, ReportKind};

const SUMMARY_SIGNATURE_COL: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: u32) -> Self {
        Cell::Number(value as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetRowStyle {
    #[default]
    Plain,
    Title,
    Header,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<Cell>,
    pub style: SheetRowStyle,
}

impl SheetRow {
    pub fn new(cells: Vec<Cell>, style: SheetRowStyle) -> Self {
        Self { cells, style }
    }

    pub fn plain(cells: Vec<Cell>) -> Self {
        Self::new(cells, SheetRowStyle::Plain)
    }

    pub fn blank() -> Self {
        Self::plain(Vec::new())
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(vec![Cell::text(text)], SheetRowStyle::Title)
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self::plain(vec![Cell::text(text)])
    }

    pub fn header(labels: &[&str]) -> Self {
        Self::new(labels.iter().map(|l| Cell::text(*l)).collect(), SheetRowStyle::Header)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub column_widths: Vec<f64>,
    pub rows: Vec<SheetRow>,
}

impl SheetData {
    fn new(name: &str, column_widths: &[f64]) -> Self {
        Self {
            name: sanitize_sheet_name(name, "Laporan"),
            column_widths: column_widths.to_vec(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: SheetRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    fn extend(&mut self, rows: impl IntoIterator<Item = SheetRow>) -> &mut Self {
        self.rows.extend(rows);
        self
    }

    /// First cell text of every row, handy for assertions.
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| match row.cells.first() {
                Some(Cell::Text(text)) => text.clone(),
                Some(Cell::Number(n)) => n.to_string(),
                _ => String::new(),
            })
            .collect()
    }
}

pub struct ExcelRenderer;

impl Renderer for ExcelRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Xlsx
    }

    fn render(&self, data: &ReportData) -> Result<Vec<u8>, ReportError> {
        Ok(write_workbook(&workbook_sheets(data))?)
    }
}

/// Describe every sheet of the workbook for `data`.
pub fn workbook_sheets(data: &ReportData) -> Vec<SheetData> {
    match &data.kind {
        ReportKind::Comprehensive { .. } => comprehensive_sheets(data),
        ReportKind::MonthlyRecap { .. } => vec![recap_sheet(data)],
        _ => vec![summary_sheet(data)],
    }
}

fn school_rows(data: &ReportData) -> Vec<SheetRow> {
    vec![
        SheetRow::title(data.school.name.clone()),
        SheetRow::line(data.school.address.clone()),
        SheetRow::line(format!("NPSN: {}", data.school.npsn)),
        SheetRow::blank(),
    ]
}

fn summary_table_rows(data: &ReportData) -> Vec<SheetRow> {
    let mut rows = vec![
        SheetRow::title("Rekapitulasi Kehadiran:"),
        SheetRow::header(&["Status", "Jumlah", "Persentase"]),
    ];
    rows.extend(summary_lines(&data.summary).into_iter().map(|line| {
        let style = if line.is_total {
            SheetRowStyle::Total
        } else {
            SheetRowStyle::Plain
        };
        SheetRow::new(
            vec![Cell::text(line.label), Cell::number(line.count), Cell::text(line.percent)],
            style,
        )
    }));
    rows
}

fn roster_rows(students: &[StudentAttendanceRow]) -> Vec<SheetRow> {
    let mut rows = vec![SheetRow::header(&["Nama", "Kelas", "Hadir", "Sakit", "Izin", "Alpha", "Total"])];
    rows.extend(students.iter().map(|s| {
        SheetRow::plain(vec![
            Cell::text(s.name.clone()),
            Cell::text(s.class.clone()),
            Cell::number(s.hadir),
            Cell::number(s.sakit),
            Cell::number(s.izin),
            Cell::number(s.alpha),
            Cell::number(s.total()),
        ])
    }));
    rows
}

fn two_sided(left: String, right: String, right_col: usize) -> SheetRow {
    let mut cells = vec![Cell::text(left)];
    cells.extend((1..right_col).map(|_| Cell::Empty));
    cells.push(Cell::text(right));
    SheetRow::plain(cells)
}

/// Download date and both signatures, the right one in column `right_col`.
fn signature_rows(data: &ReportData, right_col: usize) -> Vec<SheetRow> {
    let (left, right) = signatories(data);
    let heading = |s: &super::title::Signatory, i: usize| s.heading.get(i).cloned().unwrap_or_default();

    vec![
        SheetRow::blank(),
        SheetRow::blank(),
        SheetRow::line(downloaded_on(data)),
        SheetRow::blank(),
        two_sided(heading(&left, 0), heading(&right, 0), right_col),
        two_sided(heading(&left, 1), heading(&right, 1), right_col),
        SheetRow::blank(),
        SheetRow::blank(),
        two_sided(left.name_line(), right.name_line(), right_col),
        two_sided(left.nip_line(), right.nip_line(), right_col),
    ]
}

fn summary_sheet(data: &ReportData) -> SheetData {
    let (name, widths): (String, &[f64]) = match &data.kind {
        ReportKind::Class { class_name, .. } => (
            format!("Laporan Kelas {class_name}"),
            &[20.0, 15.0, 15.0, 10.0, 10.0, 10.0, 10.0],
        ),
        ReportKind::Student { .. } => ("Laporan Siswa".to_string(), &[20.0, 15.0, 15.0]),
        _ => ("Laporan Bulanan".to_string(), &[20.0, 15.0, 15.0]),
    };

    let mut sheet = SheetData::new(&name, widths);
    sheet.extend(school_rows(data));
    for (index, line) in sheet_title_lines(&data.kind).into_iter().enumerate() {
        if index == 0 {
            sheet.push(SheetRow::title(line));
        } else {
            sheet.push(SheetRow::line(line));
        }
    }
    sheet.push(SheetRow::blank());
    sheet.extend(summary_table_rows(data));

    if matches!(data.kind, ReportKind::Class { .. }) {
        sheet.push(SheetRow::blank());
        sheet.extend(roster_rows(&data.students));
    }

    sheet.extend(signature_rows(data, SUMMARY_SIGNATURE_COL));
    sheet
}

fn comprehensive_sheets(data: &ReportData) -> Vec<SheetData> {
    let month_label = match &data.kind {
        ReportKind::Comprehensive { month } => month.label(),
        _ => format_indonesian_date(data.generated_on),
    };

    let mut monthly = SheetData::new("Bulanan", &[20.0, 15.0, 15.0]);
    monthly
        .push(SheetRow::title(data.school.name.to_uppercase()))
        .push(SheetRow::line(data.school.address.clone()))
        .push(SheetRow::line(format!("NPSN: {}", data.school.npsn)))
        .push(SheetRow::blank())
        .push(SheetRow::title("LAPORAN REKAPITULASI KEHADIRAN BULANAN"))
        .push(SheetRow::line(format!("Periode: {month_label}")))
        .push(SheetRow::blank())
        .extend(summary_table_rows(data))
        .extend(signature_rows(data, 2));

    let mut weekly = SheetData::new("Mingguan", &[15.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
    weekly
        .push(SheetRow::title(data.school.name.clone()))
        .push(SheetRow::title("LAPORAN KEHADIRAN MINGGUAN"))
        .push(SheetRow::blank())
        .push(SheetRow::header(&["Minggu", "Hadir", "Sakit", "Izin", "Alpha", "Total"]))
        .extend(data.weekly.iter().map(|week| {
            let s = &week.summary;
            SheetRow::plain(vec![
                Cell::text(week.label.clone()),
                Cell::number(s.present),
                Cell::number(s.sick),
                Cell::number(s.permitted),
                Cell::number(s.absent),
                Cell::number(s.total),
            ])
        }))
        .extend(signature_rows(data, 2));

    let mut per_student = SheetData::new("Per Siswa", &[25.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
    per_student
        .push(SheetRow::title(data.school.name.clone()))
        .push(SheetRow::title("LAPORAN KEHADIRAN PER SISWA"))
        .push(SheetRow::blank())
        .extend(roster_rows(&data.students))
        .extend(signature_rows(data, 2));

    vec![monthly, weekly, per_student]
}

fn recap_sheet(data: &ReportData) -> SheetData {
    let mut sheet = SheetData::new("Rekap Kehadiran", &[30.0, 15.0, 10.0, 8.0, 8.0, 8.0, 8.0, 8.0]);
    sheet.extend(school_rows(data));
    for (index, line) in sheet_title_lines(&data.kind).into_iter().enumerate() {
        if index == 0 {
            sheet.push(SheetRow::title(line));
        } else {
            sheet.push(SheetRow::line(line));
        }
    }
    sheet.push(SheetRow::blank());

    let percents = AttendanceStatus::ALL
        .iter()
        .map(|status| Cell::text(format!("{}: {}", status.label(), data.summary.percent_label(*status))))
        .collect();
    sheet.push(SheetRow::plain(percents)).push(SheetRow::blank());

    sheet.push(SheetRow::header(&[
        "Nama Siswa", "NISN", "Kelas", "Hadir", "Sakit", "Izin", "Alpha", "Total",
    ]));
    sheet.extend(data.students.iter().map(|s| {
        SheetRow::plain(vec![
            Cell::text(s.name.clone()),
            Cell::text(s.nisn.clone().unwrap_or_default()),
            Cell::text(s.class.clone()),
            Cell::number(s.hadir),
            Cell::number(s.sakit),
            Cell::number(s.izin),
            Cell::number(s.alpha),
            Cell::number(s.total()),
        ])
    }));

    let sum = totals(&data.students);
    sheet.push(SheetRow::new(
        vec![
            Cell::text("TOTAL"),
            Cell::Empty,
            Cell::Empty,
            Cell::number(sum.present),
            Cell::number(sum.sick),
            Cell::number(sum.permitted),
            Cell::number(sum.absent),
            Cell::number(sum.total),
        ],
        SheetRowStyle::Total,
    ));

    sheet.extend(signature_rows(data, SUMMARY_SIGNATURE_COL));
    sheet
}

struct ExcelFormats {
    title: Format,
    header: Format,
    total: Format,
}

fn create_formats() -> ExcelFormats {
    ExcelFormats {
        title: Format::new().set_bold(),
        header: Format::new()
            .set_bold()
            .set_background_color(0xF0F9FF)
            .set_border(FormatBorder::Thin),
        total: Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin),
    }
}

/// Write sheets into an XLSX workbook held in memory.
pub fn write_workbook(sheets: &[SheetData]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let formats = create_formats();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, width) in sheet.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        for (row_index, row) in sheet.rows.iter().enumerate() {
            let row_num = row_index as u32;
            let format = match row.style {
                SheetRowStyle::Plain => None,
                SheetRowStyle::Title => Some(&formats.title),
                SheetRowStyle::Header => Some(&formats.header),
                SheetRowStyle::Total => Some(&formats.total),
            };

            for (col_index, cell) in row.cells.iter().enumerate() {
                let col = col_index as u16;
                match (cell, format) {
                    (Cell::Text(text), Some(format)) => {
                        worksheet.write_string_with_format(row_num, col, text, format)?;
                    }
                    (Cell::Text(text), None) => {
                        worksheet.write_string(row_num, col, text)?;
                    }
                    (Cell::Number(value), Some(format)) => {
                        worksheet.write_number_with_format(row_num, col, *value, format)?;
                    }
                    (Cell::Number(value), None) => {
                        worksheet.write_number(row_num, col, *value)?;
                    }
                    (Cell::Empty, _) => {}
                }
            }
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{AttendanceSummary, DateRange, MonthPeriod, PeriodSummary, SchoolInfo};
    use chrono::NaiveDate;

    fn school() -> SchoolInfo {
        SchoolInfo {
            name: "SMP Negeri 1 Cakung".to_string(),
            address: "Jl. Pendidikan No. 123".to_string(),
            npsn: "20100123".to_string(),
            principal_name: "Drs. Ahmad Sulaiman".to_string(),
            principal_nip: Some("196501011990031001".to_string()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
    }

    fn may() -> MonthPeriod {
        MonthPeriod::new(2025, 5).unwrap()
    }

    fn summary() -> AttendanceSummary {
        AttendanceSummary { present: 29, sick: 11, permitted: 0, absent: 0, total: 40 }
    }

    fn student(name: &str, hadir: u32, alpha: u32) -> StudentAttendanceRow {
        StudentAttendanceRow {
            student_id: name.to_lowercase(),
            name: name.to_string(),
            nisn: Some("0012345678".to_string()),
            class: "IX-A".to_string(),
            hadir,
            sakit: 0,
            izin: 0,
            alpha,
        }
    }

    #[test]
    fn test_monthly_sheet_layout() {
        let data = ReportData::new(school(), ReportKind::Monthly { month: may() }, summary(), today());
        let sheets = workbook_sheets(&data);
        assert_eq!(sheets.len(), 1);

        let sheet = &sheets[0];
        assert_eq!(sheet.name, "Laporan Bulanan");
        assert_eq!(sheet.column_widths, [20.0, 15.0, 15.0]);

        let first = sheet.first_column();
        assert_eq!(first[0], "SMP Negeri 1 Cakung");
        assert_eq!(first[2], "NPSN: 20100123");
        assert_eq!(first[4], "LAPORAN REKAPITULASI KEHADIRAN SISWA");
        assert_eq!(first[5], "BULAN MEI 2025");
        assert!(first.contains(&"Di unduh pada: 14 Mei 2025".to_string()));

        let hadir = sheet
            .rows
            .iter()
            .find(|r| r.cells.first() == Some(&Cell::text("Hadir")))
            .unwrap();
        assert_eq!(hadir.cells[1], Cell::Number(29.0));
        assert_eq!(hadir.cells[2], Cell::text("72.5%"));

        let total = sheet.rows.iter().find(|r| r.style == SheetRowStyle::Total).unwrap();
        assert_eq!(total.cells[2], Cell::text("100%"));
    }

    #[test]
    fn test_signature_columns() {
        let data = ReportData::new(school(), ReportKind::Monthly { month: may() }, summary(), today());
        let sheet = &workbook_sheets(&data)[0];
        let heading = sheet
            .rows
            .iter()
            .find(|r| r.cells.first() == Some(&Cell::text("Mengetahui,")))
            .unwrap();
        assert_eq!(heading.cells.len(), 5);
        assert_eq!(heading.cells[4], Cell::text("Administrator Sekolah"));

        let nip = sheet.rows.last().unwrap();
        assert_eq!(nip.cells[0], Cell::text("NIP. 196501011990031001"));
    }

    #[test]
    fn test_class_sheet_includes_roster() {
        let kind = ReportKind::Class {
            class_name: "IX/A".to_string(),
            range: DateRange::trailing_days(today(), 7).unwrap(),
        };
        let data = ReportData::new(school(), kind, summary(), today())
            .with_students(vec![student("Ani", 5, 0), student("Budi", 4, 1)]);
        let sheet = &workbook_sheets(&data)[0];

        assert_eq!(sheet.name, "Laporan Kelas IX-A");
        assert_eq!(sheet.column_widths.len(), 7);
        let budi = sheet
            .rows
            .iter()
            .find(|r| r.cells.first() == Some(&Cell::text("Budi")))
            .unwrap();
        assert_eq!(budi.cells[6], Cell::Number(5.0));
    }

    #[test]
    fn test_comprehensive_sheets() {
        let weekly = vec![PeriodSummary {
            label: "Minggu 1".to_string(),
            summary: summary(),
        }];
        let data = ReportData::new(school(), ReportKind::Comprehensive { month: may() }, summary(), today())
            .with_weekly(weekly)
            .with_students(vec![student("Ani", 5, 0)]);
        let sheets = workbook_sheets(&data);

        let names: Vec<_> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Bulanan", "Mingguan", "Per Siswa"]);
        assert_eq!(sheets[1].column_widths, [15.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        assert_eq!(sheets[2].column_widths[0], 25.0);
        assert_eq!(sheets[0].first_column()[0], "SMP NEGERI 1 CAKUNG");
        assert!(sheets[1].first_column().contains(&"Minggu 1".to_string()));
        assert!(sheets[2].first_column().contains(&"Ani".to_string()));
    }

    #[test]
    fn test_recap_sheet() {
        let kind = ReportKind::MonthlyRecap { month: may(), class_name: None };
        let data = ReportData::new(school(), kind, summary(), today())
            .with_students(vec![student("Ani", 5, 0), student("Budi", 4, 1)]);
        let sheet = &workbook_sheets(&data)[0];

        assert_eq!(sheet.name, "Rekap Kehadiran");
        assert_eq!(sheet.column_widths, [30.0, 15.0, 10.0, 8.0, 8.0, 8.0, 8.0, 8.0]);
        let percents = sheet
            .rows
            .iter()
            .find(|r| r.cells.first() == Some(&Cell::text("Hadir: 72.5%")))
            .unwrap();
        assert_eq!(percents.cells[3], Cell::text("Alpha: 0.0%"));

        let total = sheet.rows.iter().find(|r| r.style == SheetRowStyle::Total).unwrap();
        assert_eq!(total.cells[0], Cell::text("TOTAL"));
        assert_eq!(total.cells[3], Cell::Number(9.0));
        assert_eq!(total.cells[7], Cell::Number(10.0));
    }

    #[test]
    fn test_render_produces_zip_container() {
        let data = ReportData::new(school(), ReportKind::Monthly { month: may() }, AttendanceSummary::default(), today());
        let bytes = ExcelRenderer.render(&data).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }
}
