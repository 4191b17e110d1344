//! Report text shared by the PDF and spreadsheet renderers.

use crate::attendance::{AttendanceStatus, AttendanceSummary};

use super::common::{format_indonesian_date, format_indonesian_date_padded, month_title, or_dash};
use super::{ReportData, ReportKind};

pub const BLANK_NAME: &str = "_________________";
pub const BLANK_NIP: &str = "NIP. ......................................";

#[derive(Debug, Clone, PartialEq)]
pub struct TitleLine {
    pub text: String,
    /// Font size in points.
    pub size: f64,
}

impl TitleLine {
    fn new(text: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

/// Title block printed below the school header of a PDF report.
pub fn pdf_title_lines(kind: &ReportKind) -> Vec<TitleLine> {
    match kind {
        ReportKind::Monthly { month } => vec![TitleLine::new(
            format!("LAPORAN REKAPITULASI KEHADIRAN BULAN {}", month_title(*month)),
            14.0,
        )],
        ReportKind::Class { class_name, range } => vec![
            TitleLine::new(
                format!("LAPORAN REKAPITULASI KEHADIRAN {}", class_name.to_uppercase()),
                14.0,
            ),
            TitleLine::new(
                format!(
                    "Periode Tanggal {} sampai {}",
                    format_indonesian_date_padded(range.start),
                    format_indonesian_date_padded(range.end)
                ),
                12.0,
            ),
        ],
        ReportKind::Student {
            month,
            student_name,
            class_name,
        } => vec![
            TitleLine::new("LAPORAN REKAPITULASI KEHADIRAN", 14.0),
            TitleLine::new(format!("BULAN : {}", month_title(*month)), 14.0),
            TitleLine::new(format!("NAMA SISWA : {}", student_name.to_uppercase()), 11.0),
            TitleLine::new(format!("KELAS SISWA : {}", or_dash(class_name.as_deref())), 10.0),
        ],
        ReportKind::Comprehensive { month } => vec![
            TitleLine::new("LAPORAN KOMPREHENSIF KEHADIRAN SISWA", 14.0),
            TitleLine::new(format!("PERIODE : {}", month_title(*month)), 11.0),
        ],
        ReportKind::MonthlyRecap { month, .. } => vec![
            TitleLine::new("REKAP LAPORAN KEHADIRAN SISWA", 12.0),
            TitleLine::new(format!("BULAN {}", month_title(*month)), 12.0),
            TitleLine::new(format!("TAHUN {}", month.year()), 12.0),
        ],
    }
}

/// Title rows written above the summary table of a spreadsheet.
pub fn sheet_title_lines(kind: &ReportKind) -> Vec<String> {
    let mut lines = vec!["LAPORAN REKAPITULASI KEHADIRAN SISWA".to_string()];
    match kind {
        ReportKind::Monthly { month } | ReportKind::Comprehensive { month } => {
            lines.push(format!("BULAN {}", month_title(*month)));
        }
        ReportKind::Class { class_name, range } => {
            lines.push(format!("KELAS: {}", class_name.to_uppercase()));
            lines.push(format!(
                "Periode: {} - {}",
                format_indonesian_date_padded(range.start),
                format_indonesian_date_padded(range.end)
            ));
        }
        ReportKind::Student {
            month,
            student_name,
            class_name,
        } => {
            lines.push("LAPORAN REKAPITULASI KEHADIRAN".to_string());
            lines.push(format!("BULAN: {}", month_title(*month)));
            lines.push(format!("NAMA SISWA: {}", student_name.to_uppercase()));
            lines.push(format!("KELAS SISWA: {}", or_dash(class_name.as_deref())));
        }
        ReportKind::MonthlyRecap { month, .. } => {
            lines[0] = "REKAP LAPORAN KEHADIRAN SISWA".to_string();
            lines.push(format!("BULAN {}", month_title(*month)));
            lines.push(format!("TAHUN {}", month.year()));
        }
    }
    lines
}

/// One row of the Status / Jumlah / % table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub count: u32,
    pub percent: String,
    pub is_total: bool,
}

/// Four status rows followed by the total row.
pub fn summary_lines(summary: &AttendanceSummary) -> Vec<SummaryLine> {
    let mut lines: Vec<SummaryLine> = AttendanceStatus::ALL
        .iter()
        .map(|status| SummaryLine {
            label: status.label(),
            count: summary.count(*status),
            percent: summary.percent_label(*status),
            is_total: false,
        })
        .collect();
    lines.push(SummaryLine {
        label: "Total",
        count: summary.total,
        percent: summary.total_percent_label(),
        is_total: true,
    });
    lines
}

pub fn downloaded_on(data: &ReportData) -> String {
    format!("Di unduh pada: {}", format_indonesian_date(data.generated_on))
}

/// One side of the signature block.
#[derive(Debug, Clone, PartialEq)]
pub struct Signatory {
    pub heading: Vec<String>,
    pub name: Option<String>,
    pub nip: Option<String>,
}

impl Signatory {
    pub fn name_line(&self) -> String {
        self.name.clone().unwrap_or_else(|| BLANK_NAME.to_string())
    }

    pub fn nip_line(&self) -> String {
        match &self.nip {
            Some(nip) => format!("NIP. {nip}"),
            None => BLANK_NIP.to_string(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Left: the principal. Right: the school administrator for monthly
/// reports, otherwise the homeroom teacher.
pub fn signatories(data: &ReportData) -> (Signatory, Signatory) {
    let principal = Signatory {
        heading: vec!["Mengetahui,".to_string(), "Kepala Sekolah".to_string()],
        name: non_blank(&data.school.principal_name),
        nip: data.school.principal_nip.as_deref().and_then(non_blank),
    };

    let right = match &data.kind {
        ReportKind::Monthly { .. } => Signatory {
            heading: vec!["Administrator Sekolah".to_string(), data.school.name.clone()],
            name: None,
            nip: None,
        },
        _ => Signatory {
            heading: vec!["Wali Kelas".to_string()],
            name: data.homeroom_teacher.clone(),
            nip: None,
        },
    };

    (principal, right)
}
