//! Common utilities for report generation.
//!
//! Shared helpers for Indonesian date formatting, file naming and text fitting.

use chrono::{Datelike, NaiveDate};

use crate::attendance::period::{MonthPeriod, INDONESIAN_MONTHS};

use super::{ReportFormat, ReportKind};

/// Names longer than this are clipped in table cells.
pub const NAME_DISPLAY_LIMIT: usize = 18;
const NAME_KEEP_CHARS: usize = 16;
const SHEET_NAME_LIMIT: usize = 31;

fn month_name(date: NaiveDate) -> &'static str {
    INDONESIAN_MONTHS[(date.month0() as usize).min(INDONESIAN_MONTHS.len() - 1)]
}

/// Format a date in Indonesian long form (e.g., "5 Mei 2025").
pub fn format_indonesian_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name(date), date.year())
}

/// Same as [`format_indonesian_date`] with a zero-padded day ("05 Mei 2025").
pub fn format_indonesian_date_padded(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_name(date), date.year())
}

/// Upper-cased month label used in report titles ("MEI 2025").
pub fn month_title(month: MonthPeriod) -> String {
    month.label().to_uppercase()
}

/// Download filename for a report generated on `generated_on`.
pub fn report_filename(kind: &ReportKind, format: ReportFormat, generated_on: NaiveDate) -> String {
    let stamp = generated_on.format("%d-%m-%Y");
    let ext = format.extension();
    match kind {
        ReportKind::Monthly { .. } => format!("Laporan_monthly_{stamp}.{ext}"),
        ReportKind::Class { .. } => format!("Laporan_class_{stamp}.{ext}"),
        ReportKind::Student { .. } => format!("Laporan_student_{stamp}.{ext}"),
        ReportKind::Comprehensive { .. } => format!("Laporan_Komprehensif_{stamp}.{ext}"),
        ReportKind::MonthlyRecap { month, .. } => {
            format!("Rekap_Kehadiran_{}.{ext}", month.label().replace(' ', "_"))
        }
    }
}

/// Clip a display name to fit a table column: more than 18 characters
/// become the first 16 followed by "...".
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_DISPLAY_LIMIT {
        let head: String = name.chars().take(NAME_KEEP_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Make a worksheet name acceptable to spreadsheet readers.
pub fn sanitize_sheet_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| match ch {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            other => other,
        })
        .take(SHEET_NAME_LIMIT)
        .collect();

    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned
}

/// Fallback for missing text values in tables.
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
