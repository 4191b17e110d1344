//! Status normalization.
//!
//! Check-in writers store the status either as the Indonesian short code
//! (`hadir`, `sakit`, `izin`, `alpha`) or the English one (`present`, `sick`,
//! `permitted`, `absent`). Every counter in the crate goes through
//! [`AttendanceStatus::from_code`] so both vocabularies land in the same bucket.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical attendance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Sick,
    Permitted,
    Absent,
}

impl AttendanceStatus {
    /// All buckets in report row order.
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Sick,
        AttendanceStatus::Permitted,
        AttendanceStatus::Absent,
    ];

    /// Classify a raw status code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "hadir" | "present" => Some(Self::Present),
            "sakit" | "sick" => Some(Self::Sick),
            "izin" | "permitted" => Some(Self::Permitted),
            "alpha" | "absent" => Some(Self::Absent),
            _ => None,
        }
    }

    /// Indonesian display label used in every report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Present => "Hadir",
            Self::Sick => "Sakit",
            Self::Permitted => "Izin",
            Self::Absent => "Alpha",
        }
    }

    /// Short code as stored by the Indonesian check-in client.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Present => "hadir",
            Self::Sick => "sakit",
            Self::Permitted => "izin",
            Self::Absent => "alpha",
        }
    }
}

/// Label for a raw code, falling back to the code itself when unrecognized.
pub fn display_label(code: &str) -> String {
    AttendanceStatus::from_code(code)
        .map(|status| status.label().to_string())
        .unwrap_or_else(|| code.to_string())
}
