//! Input validation for report requests.
//!
//! Messages are Indonesian and carry a suggestion, so the dashboard can show
//! them to users as-is.

use chrono::NaiveDate;
use std::fmt;

use crate::attendance::period::MonthPeriod;

/// Longest range a custom period may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Validation error with detailed, user-friendly messages.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message in Indonesian
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} tidak boleh kosong", label)).with_suggestion(format!(
            "Mohon isi {} dengan data yang valid",
            label.to_lowercase()
        ))
    }

    pub fn invalid_month(field: &str, value: &str) -> Self {
        Self::new(field, format!("Format bulan '{}' tidak valid", value))
            .with_suggestion("Gunakan format: YYYY-MM (contoh: 2025-05)")
    }

    pub fn inverted_range(field: &str) -> Self {
        Self::new(field, "Tanggal mulai tidak boleh melewati tanggal akhir")
            .with_suggestion("Periksa kembali urutan tanggal mulai dan tanggal akhir")
    }

    pub fn date_out_of_range(field: &str) -> Self {
        Self::new(field, "Tanggal berada di luar rentang yang didukung")
            .with_suggestion("Gunakan tanggal dalam format YYYY-MM-DD (contoh: 2025-05-14)")
    }

    pub fn range_too_long(field: &str, days: i64) -> Self {
        Self::new(
            field,
            format!("Rentang tanggal {} hari melebihi batas {} hari", days, MAX_RANGE_DAYS),
        )
        .with_suggestion("Pilih periode yang lebih pendek, misalnya satu bulan")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Numbered list of every error, one per line.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validasi gagal: {} kesalahan ditemukan",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// Convert to Result - Ok if no errors, Err with formatted message if errors exist
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate an optional `yyyy-MM` month; absent means the current month.
pub fn validate_month(value: Option<&str>, field: &str, errors: &mut ValidationErrors) {
    if let Some(value) = value {
        if MonthPeriod::parse(value).is_err() {
            errors.add(ValidationError::invalid_month(field, value));
        }
    }
}

/// Validate an explicit date range when both ends are given.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    field: &str,
    errors: &mut ValidationErrors,
) {
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };
    if start > end {
        errors.add(ValidationError::inverted_range(field));
        return;
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        errors.add(ValidationError::range_too_long(field, days));
    }
}
