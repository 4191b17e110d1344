//! Attendance domain: records, status normalization, periods and aggregation.
//!
//! - `status` - bilingual status codes to canonical buckets
//! - `period` - month and week windows
//! - `aggregate` - summaries and partitions shared by reports and dashboards
//! - `filter` - history view filtering

pub mod aggregate;
pub mod filter;
pub mod model;
pub mod period;
pub mod status;

pub use aggregate::{
    daily_breakdown, roster_rows, summarize, summarize_by, totals, weekly_breakdown,
    AttendanceSummary, Partition, PeriodSummary, StudentAttendanceRow,
};
pub use model::{AttendanceQuery, AttendanceRecord, ClassInfo, SchoolInfo, Student};
pub use period::{DateRange, MonthPeriod};
pub use status::AttendanceStatus;
