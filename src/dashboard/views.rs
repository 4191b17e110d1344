//! Role specific dashboard view models.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::attendance::filter::{history, HistoryEntry, HistoryFilter};
use crate::attendance::{
    summarize, AttendanceQuery, AttendanceRecord, AttendanceSummary, ClassInfo, DateRange, MonthPeriod,
    SchoolInfo, Student,
};
use crate::auth::{Claims, Role};
use crate::db::{AttendanceStore, StoreError};

use super::preferences::DashboardPreferences;

/// Records listed in the "recent" tables.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("student '{0}' not found")]
    StudentNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_classes: usize,
    pub total_teachers: i64,
    /// Month-to-date share of "hadir", in whole percent.
    pub attendance_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClassDistribution {
    #[schema(example = "IX-A")]
    pub name: String,
    pub students: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub school_name: String,
    pub stats: DashboardStats,
    pub class_distribution: Vec<ClassDistribution>,
    pub recent: Vec<HistoryEntry>,
    pub preferences: DashboardPreferences,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeacherDashboard {
    pub school_name: String,
    pub stats: DashboardStats,
    pub today: AttendanceSummary,
    pub recent: Vec<HistoryEntry>,
    pub preferences: DashboardPreferences,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDashboard {
    pub school_name: String,
    pub student_name: String,
    pub class_name: String,
    #[schema(example = "Mei 2025")]
    pub month: String,
    pub summary: AttendanceSummary,
    pub recent: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}

pub fn school_stats(
    students: &[Student],
    classes: &[ClassInfo],
    total_teachers: i64,
    month_records: &[AttendanceRecord],
) -> DashboardStats {
    DashboardStats {
        total_students: students.len(),
        total_classes: classes.len(),
        total_teachers,
        attendance_rate: summarize(month_records).attendance_rate(),
    }
}

/// Students per class, in class order.
pub fn class_distribution(students: &[Student], classes: &[ClassInfo]) -> Vec<ClassDistribution> {
    classes
        .iter()
        .map(|class| ClassDistribution {
            name: class.name.clone(),
            students: students.iter().filter(|s| s.class == class.name).count(),
        })
        .collect()
}

fn recent_entries(records: Vec<AttendanceRecord>) -> Vec<HistoryEntry> {
    let mut entries = history(records, &HistoryFilter::default());
    entries.truncate(RECENT_LIMIT);
    entries
}

/// Build the dashboard for the session in `claims`.
pub async fn build_dashboard(
    store: &(dyn AttendanceStore + Send + Sync),
    school: &SchoolInfo,
    claims: &Claims,
    preferences: DashboardPreferences,
    today: NaiveDate,
) -> Result<DashboardView, DashboardError> {
    let school_id = claims.school_id.as_str();
    let month = MonthPeriod::of(today);
    let month_to_date = DateRange::new(month.first_day(), today);

    if let Some(student_id) = claims.own_student_id() {
        let student = store
            .fetch_student(school_id, student_id)
            .await?
            .ok_or_else(|| DashboardError::StudentNotFound(student_id.to_string()))?;
        let query = AttendanceQuery::for_range(month.range()).with_student(student_id);
        let records = store.fetch_attendance(school_id, &query).await?;

        return Ok(DashboardView::Student(StudentDashboard {
            school_name: school.name.clone(),
            student_name: student.name,
            class_name: student.class,
            month: month.label(),
            summary: summarize(&records),
            recent: recent_entries(records),
        }));
    }

    let students = store.fetch_students(school_id, None).await?;
    let classes = store.fetch_classes(school_id).await?;
    let teachers = store.count_teachers(school_id).await?;
    let month_records = store
        .fetch_attendance(school_id, &AttendanceQuery::for_range(month_to_date))
        .await?;
    let recent = recent_entries(store.recent_attendance(school_id, RECENT_LIMIT as i64).await?);
    let stats = school_stats(&students, &classes, teachers, &month_records);

    let view = match claims.role {
        Role::Teacher => DashboardView::Teacher(TeacherDashboard {
            school_name: school.name.clone(),
            stats,
            today: summarize(month_records.iter().filter(|r| r.date == today)),
            recent,
            preferences,
        }),
        _ => DashboardView::Admin(AdminDashboard {
            school_name: school.name.clone(),
            stats,
            class_distribution: class_distribution(&students, &classes),
            recent,
            preferences,
        }),
    };
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, class: &str) -> Student {
        Student {
            id: id.to_string(),
            name: id.to_uppercase(),
            nisn: None,
            class: class.to_string(),
            gender: None,
        }
    }

    fn class(name: &str) -> ClassInfo {
        ClassInfo {
            id: name.to_lowercase(),
            name: name.to_string(),
            teacher_name: None,
        }
    }

    fn record(status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: "a".to_string(),
            student_id: "s1".to_string(),
            student_name: "S1".to_string(),
            class: "IX-A".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 14).unwrap(),
            time: "07:00".to_string(),
            status: status.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_class_distribution_keeps_empty_classes() {
        let students = vec![student("s1", "IX-A"), student("s2", "IX-A"), student("s3", "IX-B")];
        let classes = vec![class("IX-A"), class("IX-B"), class("IX-C")];
        let distribution = class_distribution(&students, &classes);
        let counts: Vec<_> = distribution.iter().map(|d| (d.name.as_str(), d.students)).collect();
        assert_eq!(counts, [("IX-A", 2), ("IX-B", 1), ("IX-C", 0)]);
    }

    #[test]
    fn test_stats_attendance_rate() {
        let records = vec![record("hadir"), record("present"), record("sakit"), record("alpha")];
        let stats = school_stats(&[student("s1", "IX-A")], &[class("IX-A")], 3, &records);
        assert_eq!(stats.total_students, 1);
        assert_eq!(stats.total_teachers, 3);
        assert_eq!(stats.attendance_rate, 50);
    }

    #[test]
    fn test_stats_without_records() {
        let stats = school_stats(&[], &[], 0, &[]);
        assert_eq!(stats.attendance_rate, 0);
    }

    #[test]
    fn test_view_is_tagged_with_role() {
        let view = DashboardView::Student(StudentDashboard {
            school_name: "SMP".to_string(),
            student_name: "Siti".to_string(),
            class_name: "IX-A".to_string(),
            month: "Mei 2025".to_string(),
            summary: AttendanceSummary::default(),
            recent: Vec::new(),
        });
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["role"], "student");
        assert_eq!(value["month"], "Mei 2025");
    }
}
