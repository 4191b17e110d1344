//! Traits shared by report requests and renderers.

use super::{ReportData, ReportError, ReportFormat};

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), String>;
}

/// Trait for document renderers.
pub trait Renderer {
    fn format(&self) -> ReportFormat;

    /// Render report data into the bytes of a complete file.
    fn render(&self, data: &ReportData) -> Result<Vec<u8>, ReportError>;
}
