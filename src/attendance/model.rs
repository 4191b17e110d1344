use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::period::DateRange;

/// Attendance row written by the check-in client. Never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct AttendanceRecord {
    #[schema(example = "att-0001")]
    pub id: String,
    #[schema(example = "stu-0001")]
    pub student_id: String,
    #[schema(example = "Ahmad Farhan")]
    pub student_name: String,
    #[schema(example = "IX-A")]
    pub class: String,
    #[schema(value_type = String, example = "2025-05-14")]
    pub date: NaiveDate,
    #[schema(example = "07:15")]
    pub time: String,
    #[schema(example = "hadir")]
    pub status: String,
    pub note: Option<String>,
}

/// School reference data printed in every report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct SchoolInfo {
    #[schema(example = "SMP Negeri 1 Cakung")]
    pub name: String,
    #[schema(example = "Jl. Pendidikan No. 123, Jakarta Timur")]
    pub address: String,
    #[schema(example = "20100123")]
    pub npsn: String,
    #[schema(example = "Drs. Ahmad Sulaiman, M.Pd.")]
    pub principal_name: String,
    pub principal_nip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Student {
    pub id: String,
    #[schema(example = "Siti Aisyah")]
    pub name: String,
    #[schema(example = "0012345678")]
    pub nisn: Option<String>,
    #[schema(example = "VIII-B")]
    pub class: String,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ClassInfo {
    pub id: String,
    #[schema(example = "IX-A")]
    pub name: String,
    pub teacher_name: Option<String>,
}

/// Filter pushed down to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceQuery {
    pub range: DateRange,
    pub class_filter: Option<String>,
    pub student_id: Option<String>,
}

impl AttendanceQuery {
    pub fn for_range(range: DateRange) -> Self {
        Self {
            range,
            class_filter: None,
            student_id: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_filter = Some(class_name.into());
        self
    }

    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }
}
