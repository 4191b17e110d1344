//! Report generation - attendance summaries rendered as PDF or XLSX documents.
//!
//! - `service` - fetches and aggregates the data for each report kind
//! - `title` - report text shared by both formats (titles, signatures)
//! - `layout` / `canvas` / `fonts` - declarative tables drawn on A4 pages
//! - `pdf` - PDF renderer
//! - `excel` - spreadsheet renderer

pub mod canvas;
pub mod common;
pub mod excel;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod request;
pub mod service;
pub mod title;
pub mod traits;
pub mod validation;

pub use excel::ExcelRenderer;
pub use pdf::PdfRenderer;
pub use request::{ReportQuery, ReportRequest, ReportScope};
pub use service::ReportService;
pub use traits::{Renderer, Validator};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::attendance::{AttendanceSummary, DateRange, MonthPeriod, PeriodSummary, SchoolInfo, StudentAttendanceRow};
use crate::db::StoreError;

/// Errors that can occur while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid report request: {0}")]
    InvalidRequest(String),
    #[error("school '{0}' not found")]
    SchoolNotFound(String),
    #[error("student '{0}' not found")]
    StudentNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to encode spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    #[serde(alias = "excel")]
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Which report is produced, with the context its title needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportKind {
    Monthly {
        month: MonthPeriod,
    },
    Class {
        class_name: String,
        range: DateRange,
    },
    Student {
        month: MonthPeriod,
        student_name: String,
        class_name: Option<String>,
    },
    Comprehensive {
        month: MonthPeriod,
    },
    MonthlyRecap {
        month: MonthPeriod,
        class_name: Option<String>,
    },
}

impl ReportKind {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Monthly { .. } => "monthly",
            ReportKind::Class { .. } => "class",
            ReportKind::Student { .. } => "student",
            ReportKind::Comprehensive { .. } => "comprehensive",
            ReportKind::MonthlyRecap { .. } => "monthly-recap",
        }
    }
}

/// Everything a renderer needs. Built by [`ReportService`], never persisted.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub school: SchoolInfo,
    pub kind: ReportKind,
    pub summary: AttendanceSummary,
    /// One row per roster student, for the kinds that list students.
    pub students: Vec<StudentAttendanceRow>,
    /// Weekly partitions, comprehensive report only.
    pub weekly: Vec<PeriodSummary>,
    /// Right-hand signatory for class based reports.
    pub homeroom_teacher: Option<String>,
    pub generated_on: NaiveDate,
}

impl ReportData {
    pub fn new(school: SchoolInfo, kind: ReportKind, summary: AttendanceSummary, generated_on: NaiveDate) -> Self {
        Self {
            school,
            kind,
            summary,
            students: Vec::new(),
            weekly: Vec::new(),
            homeroom_teacher: None,
            generated_on,
        }
    }

    pub fn with_students(mut self, students: Vec<StudentAttendanceRow>) -> Self {
        self.students = students;
        self
    }

    pub fn with_weekly(mut self, weekly: Vec<PeriodSummary>) -> Self {
        self.weekly = weekly;
        self
    }

    pub fn with_homeroom_teacher(mut self, teacher: Option<String>) -> Self {
        self.homeroom_teacher = teacher.filter(|t| !t.trim().is_empty());
        self
    }
}

/// Result of a successful report generation.
#[derive(Debug)]
pub struct GeneratedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub tanggal: String,
}

/// Render `data` in the requested format.
pub fn render_report(data: &ReportData, format: ReportFormat) -> Result<GeneratedReport, ReportError> {
    let renderer: &dyn Renderer = match format {
        ReportFormat::Pdf => &PdfRenderer,
        ReportFormat::Xlsx => &ExcelRenderer,
    };
    let format = renderer.format();
    let bytes = renderer.render(data)?;
    let filename = common::report_filename(&data.kind, format, data.generated_on);

    log::info!(
        "Generated {} report {} ({} bytes)",
        data.kind.name(),
        filename,
        bytes.len()
    );

    Ok(GeneratedReport {
        filename,
        bytes,
        content_type: format.content_type(),
        tanggal: common::format_indonesian_date(data.generated_on),
    })
}
