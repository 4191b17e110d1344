//! Report assembly: fetch from the store, aggregate, hand to a renderer.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::attendance::period::trailing_weeks;
use crate::attendance::{
    roster_rows, summarize, totals, weekly_breakdown, AttendanceQuery, AttendanceRecord, DateRange,
    SchoolInfo,
};
use crate::db::AttendanceStore;

use super::request::{ReportRequest, ReportScope};
use super::traits::Validator;
use super::validation::ValidationError;
use super::{render_report, GeneratedReport, ReportData, ReportError, ReportKind};

/// Weeks shown in the comprehensive report.
pub const COMPREHENSIVE_WEEKS: usize = 4;

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn AttendanceStore + Send + Sync>,
    schools: Cache<String, SchoolInfo>,
}

impl ReportService {
    pub fn new(store: Arc<dyn AttendanceStore + Send + Sync>, school_cache_ttl: Duration) -> Self {
        let schools = Cache::builder()
            .time_to_live(school_cache_ttl)
            .max_capacity(100)
            .build();
        Self { store, schools }
    }

    /// School header data, served from cache when fresh.
    pub async fn fetch_school(&self, school_id: &str) -> Result<SchoolInfo, ReportError> {
        if let Some(school) = self.schools.get(school_id).await {
            return Ok(school);
        }

        let school = self
            .store
            .fetch_school_info(school_id)
            .await?
            .ok_or_else(|| ReportError::SchoolNotFound(school_id.to_string()))?;

        self.schools
            .insert(school_id.to_string(), school.clone())
            .await;
        Ok(school)
    }

    async fn homeroom_teacher(&self, school_id: &str, class_name: &str) -> Result<Option<String>, ReportError> {
        let classes = self.store.fetch_classes(school_id).await?;
        Ok(classes
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(class_name))
            .and_then(|c| c.teacher_name))
    }

    /// Validate `request` and collect everything its report needs.
    pub async fn build(&self, request: &ReportRequest) -> Result<ReportData, ReportError> {
        request.validate().map_err(ReportError::InvalidRequest)?;

        let school_id = request.school_id.as_str();
        let school = self.fetch_school(school_id).await?;
        let month = request.month();
        let today = request.today;

        let data = match &request.scope {
            ReportScope::Monthly { .. } => {
                let records = self
                    .store
                    .fetch_attendance(school_id, &AttendanceQuery::for_range(month.range()))
                    .await?;
                ReportData::new(school, ReportKind::Monthly { month }, summarize(&records), today)
            }
            ReportScope::Class { class_name, .. } => {
                let range = request
                    .class_range()
                    .ok_or_else(|| ReportError::InvalidRequest(ValidationError::date_out_of_range("end").to_string()))?;
                let query = AttendanceQuery::for_range(range).with_class(class_name.clone());
                let records = self.store.fetch_attendance(school_id, &query).await?;
                let students = self.store.fetch_students(school_id, Some(class_name)).await?;
                let teacher = self.homeroom_teacher(school_id, class_name).await?;

                let kind = ReportKind::Class {
                    class_name: class_name.clone(),
                    range,
                };
                ReportData::new(school, kind, summarize(&records), today)
                    .with_students(roster_rows(&students, &records))
                    .with_homeroom_teacher(teacher)
            }
            ReportScope::Student { student_id, .. } => {
                let student = self
                    .store
                    .fetch_student(school_id, student_id)
                    .await?
                    .ok_or_else(|| ReportError::StudentNotFound(student_id.clone()))?;
                let query = AttendanceQuery::for_range(month.range()).with_student(student_id.clone());
                let records = self.store.fetch_attendance(school_id, &query).await?;

                let class_name = Some(student.class.trim().to_string()).filter(|c| !c.is_empty());
                let teacher = match &class_name {
                    Some(class_name) => self.homeroom_teacher(school_id, class_name).await?,
                    None => None,
                };

                let kind = ReportKind::Student {
                    month,
                    student_name: student.name,
                    class_name,
                };
                ReportData::new(school, kind, summarize(&records), today).with_homeroom_teacher(teacher)
            }
            ReportScope::Comprehensive { .. } => {
                let weeks = trailing_weeks(today, COMPREHENSIVE_WEEKS);
                let mut range = month.range();
                if let (Some(first), Some(last)) = (weeks.first(), weeks.last()) {
                    range = range.union(&DateRange::new(first.start, last.end));
                }

                let records = self
                    .store
                    .fetch_attendance(school_id, &AttendanceQuery::for_range(range))
                    .await?;
                let in_month: Vec<AttendanceRecord> = records
                    .iter()
                    .filter(|r| month.contains(r.date))
                    .cloned()
                    .collect();
                let students = self.store.fetch_students(school_id, None).await?;

                ReportData::new(school, ReportKind::Comprehensive { month }, summarize(&in_month), today)
                    .with_weekly(weekly_breakdown(&records, today, COMPREHENSIVE_WEEKS))
                    .with_students(roster_rows(&students, &in_month))
            }
            ReportScope::MonthlyRecap { class_name, .. } => {
                let class_name = class_name.as_ref().map(|c| c.trim().to_string());
                let mut query = AttendanceQuery::for_range(month.range());
                if let Some(class_name) = &class_name {
                    query = query.with_class(class_name.clone());
                }
                let records = self.store.fetch_attendance(school_id, &query).await?;
                let students = self
                    .store
                    .fetch_students(school_id, class_name.as_deref())
                    .await?;
                let teacher = match &class_name {
                    Some(class_name) => self.homeroom_teacher(school_id, class_name).await?,
                    None => None,
                };

                let rows = roster_rows(&students, &records);
                let summary = totals(&rows);
                ReportData::new(school, ReportKind::MonthlyRecap { month, class_name }, summary, today)
                    .with_students(rows)
                    .with_homeroom_teacher(teacher)
            }
        };

        Ok(data)
    }

    /// Build and render in one step. Nothing is returned on failure.
    pub async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, ReportError> {
        let data = self.build(request).await?;
        render_report(&data, request.format).map_err(|e| {
            log::error!("Failed to render {} report: {}", data.kind.name(), e);
            e
        })
    }
}
