//! Report requests as received from the HTTP layer.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::attendance::period::{DateRange, MonthPeriod};

use super::traits::Validator;
use super::validation::{
    validate_date_range, validate_month, validate_required, ValidationError, ValidationErrors,
};
use super::ReportFormat;

/// Days covered by a class report when no explicit range is given.
pub const CLASS_REPORT_DAYS: i64 = 7;

/// Query string accepted by every report endpoint.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// `pdf` (default) or `xlsx`
    #[param(value_type = Option<String>, example = "pdf")]
    pub format: Option<ReportFormat>,
    /// Month as `yyyy-MM`, defaults to the current month
    #[param(example = "2025-05")]
    pub month: Option<String>,
    /// Class name for class reports and class filtered recaps
    #[param(example = "IX-A")]
    pub class_name: Option<String>,
    #[param(value_type = Option<String>, example = "2025-05-01")]
    pub start: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-05-07")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportScope {
    Monthly {
        month: Option<String>,
    },
    Class {
        class_name: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Student {
        student_id: String,
        month: Option<String>,
    },
    Comprehensive {
        month: Option<String>,
    },
    MonthlyRecap {
        month: Option<String>,
        class_name: Option<String>,
    },
}

/// A validated-on-demand report request for one school.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub school_id: String,
    pub scope: ReportScope,
    pub format: ReportFormat,
    /// Generation date; also anchors default periods.
    pub today: NaiveDate,
}

impl ReportRequest {
    pub fn new(school_id: impl Into<String>, scope: ReportScope, format: ReportFormat, today: NaiveDate) -> Self {
        Self {
            school_id: school_id.into(),
            scope,
            format,
            today,
        }
    }

    fn month_param(&self) -> Option<&str> {
        match &self.scope {
            ReportScope::Monthly { month }
            | ReportScope::Student { month, .. }
            | ReportScope::Comprehensive { month }
            | ReportScope::MonthlyRecap { month, .. } => month.as_deref(),
            ReportScope::Class { .. } => None,
        }
    }

    /// Requested month, or the month of `today`.
    pub fn month(&self) -> MonthPeriod {
        self.month_param()
            .and_then(|m| MonthPeriod::parse(m).ok())
            .unwrap_or_else(|| MonthPeriod::of(self.today))
    }

    /// Period of a class report: the explicit range, or the week before `end`.
    /// `None` when the default start is not a representable date.
    pub fn class_range(&self) -> Option<DateRange> {
        match &self.scope {
            ReportScope::Class { start, end, .. } => {
                let end = end.unwrap_or(self.today);
                let start = match start {
                    Some(start) => *start,
                    None => DateRange::trailing_days(end, CLASS_REPORT_DAYS)?.start,
                };
                Some(DateRange::new(start, end))
            }
            _ => DateRange::trailing_days(self.today, CLASS_REPORT_DAYS),
        }
    }
}

impl Validator for ReportRequest {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.school_id, "school_id", "Sekolah", &mut errors);
        validate_month(self.month_param(), "month", &mut errors);

        match &self.scope {
            ReportScope::Class { class_name, .. } => {
                validate_required(class_name, "class_name", "Nama Kelas", &mut errors);
                match self.class_range() {
                    Some(range) => validate_date_range(Some(range.start), Some(range.end), "start", &mut errors),
                    None => errors.add(ValidationError::date_out_of_range("end")),
                }
            }
            ReportScope::Student { student_id, .. } => {
                validate_required(student_id, "student_id", "Siswa", &mut errors);
            }
            ReportScope::MonthlyRecap {
                class_name: Some(class_name),
                ..
            } => {
                validate_required(class_name, "class_name", "Nama Kelas", &mut errors);
            }
            _ => {}
        }

        errors.into_result()
    }
}
