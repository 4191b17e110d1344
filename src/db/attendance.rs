//! Attendance store backed by Postgres

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AttendanceStore, StoreError};
use crate::attendance::{AttendanceQuery, AttendanceRecord, ClassInfo, SchoolInfo, Student};

const RECORD_COLUMNS: &str =
    "id, student_id, student_name, class_name AS class, date, time, status, note";

#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn fetch_school_info(&self, school_id: &str) -> Result<Option<SchoolInfo>, StoreError> {
        let school = sqlx::query_as::<_, SchoolInfo>(
            "SELECT name, address, npsn, principal_name, principal_nip FROM schools WHERE id = $1",
        )
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(school)
    }

    async fn fetch_students(&self, school_id: &str, class_filter: Option<&str>) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, nisn, class_name AS class, gender
            FROM students
            WHERE school_id = $1 AND ($2::text IS NULL OR class_name = $2)
            ORDER BY class_name, name
            "#,
        )
        .bind(school_id)
        .bind(class_filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn fetch_student(&self, school_id: &str, student_id: &str) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, name, nisn, class_name AS class, gender FROM students WHERE school_id = $1 AND id = $2",
        )
        .bind(school_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn fetch_classes(&self, school_id: &str) -> Result<Vec<ClassInfo>, StoreError> {
        let classes = sqlx::query_as::<_, ClassInfo>(
            "SELECT id, name, teacher_name FROM classes WHERE school_id = $1 ORDER BY name",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn fetch_attendance(
        &self,
        school_id: &str,
        query: &AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM attendance
            WHERE school_id = $1
              AND date BETWEEN $2 AND $3
              AND ($4::text IS NULL OR class_name = $4)
              AND ($5::text IS NULL OR student_id = $5)
            ORDER BY date, time
            "#
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(school_id)
            .bind(query.range.start)
            .bind(query.range.end)
            .bind(query.class_filter.as_deref())
            .bind(query.student_id.as_deref())
            .fetch_all(&self.pool)
            .await?;
        log::debug!(
            "Fetched {} attendance records for {} between {} and {}",
            records.len(),
            school_id,
            query.range.start,
            query.range.end
        );
        Ok(records)
    }

    async fn recent_attendance(&self, school_id: &str, limit: i64) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM attendance WHERE school_id = $1 ORDER BY date DESC, time DESC LIMIT $2"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(school_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn count_teachers(&self, school_id: &str) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE school_id = $1 AND role = 'teacher'",
        )
        .bind(school_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
