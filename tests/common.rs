#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use absensi_server::attendance::{AttendanceQuery, AttendanceRecord, ClassInfo, SchoolInfo, Student};
use absensi_server::auth::{generate_access_token, Role};
use absensi_server::dashboard::MemoryPreferenceStore;
use absensi_server::db::{AttendanceStore, StoreError};
use absensi_server::AppState;

pub const SCHOOL_ID: &str = "school-1";
pub const SECRET: &str = "integration-test-secret";

/// In-memory attendance store seeded per test.
#[derive(Default)]
pub struct MockAttendanceStore {
    schools: HashMap<String, SchoolInfo>,
    students: Vec<(String, Student)>,
    classes: Vec<(String, ClassInfo)>,
    records: Vec<(String, AttendanceRecord)>,
    teachers: HashMap<String, i64>,
    failing: AtomicBool,
}

impl MockAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_school(mut self, school_id: &str, school: SchoolInfo) -> Self {
        self.schools.insert(school_id.to_string(), school);
        self
    }

    pub fn with_class(mut self, school_id: &str, name: &str, teacher: Option<&str>) -> Self {
        self.classes.push((
            school_id.to_string(),
            ClassInfo {
                id: name.to_lowercase(),
                name: name.to_string(),
                teacher_name: teacher.map(str::to_string),
            },
        ));
        self
    }

    pub fn with_student(mut self, school_id: &str, id: &str, name: &str, class: &str) -> Self {
        self.students.push((
            school_id.to_string(),
            Student {
                id: id.to_string(),
                name: name.to_string(),
                nisn: Some(format!("00{}", id.len())),
                class: class.to_string(),
                gender: None,
            },
        ));
        self
    }

    pub fn with_record(mut self, school_id: &str, student_id: &str, date: NaiveDate, status: &str) -> Self {
        let (name, class) = self
            .students
            .iter()
            .find(|(_, s)| s.id == student_id)
            .map(|(_, s)| (s.name.clone(), s.class.clone()))
            .unwrap_or_else(|| (student_id.to_string(), String::new()));
        let id = format!("att-{}", self.records.len() + 1);
        self.records.push((
            school_id.to_string(),
            AttendanceRecord {
                id,
                student_id: student_id.to_string(),
                student_name: name,
                class,
                date,
                time: "07:00".to_string(),
                status: status.to_string(),
                note: None,
            },
        ));
        self
    }

    pub fn with_teachers(mut self, school_id: &str, count: i64) -> Self {
        self.teachers.insert(school_id.to_string(), count);
        self
    }

    /// Make every following call fail like a lost connection.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AttendanceStore for MockAttendanceStore {
    async fn fetch_school_info(&self, school_id: &str) -> Result<Option<SchoolInfo>, StoreError> {
        self.check()?;
        Ok(self.schools.get(school_id).cloned())
    }

    async fn fetch_students(&self, school_id: &str, class_filter: Option<&str>) -> Result<Vec<Student>, StoreError> {
        self.check()?;
        Ok(self
            .students
            .iter()
            .filter(|(school, s)| school == school_id && class_filter.map_or(true, |c| s.class == c))
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn fetch_student(&self, school_id: &str, student_id: &str) -> Result<Option<Student>, StoreError> {
        self.check()?;
        Ok(self
            .students
            .iter()
            .find(|(school, s)| school == school_id && s.id == student_id)
            .map(|(_, s)| s.clone()))
    }

    async fn fetch_classes(&self, school_id: &str) -> Result<Vec<ClassInfo>, StoreError> {
        self.check()?;
        Ok(self
            .classes
            .iter()
            .filter(|(school, _)| school == school_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn fetch_attendance(
        &self,
        school_id: &str,
        query: &AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.check()?;
        let mut records: Vec<AttendanceRecord> = self
            .records
            .iter()
            .filter(|(school, r)| {
                school == school_id
                    && query.range.contains(r.date)
                    && query.class_filter.as_ref().map_or(true, |c| &r.class == c)
                    && query.student_id.as_ref().map_or(true, |id| &r.student_id == id)
            })
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        Ok(records)
    }

    async fn recent_attendance(&self, school_id: &str, limit: i64) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.check()?;
        let mut records: Vec<AttendanceRecord> = self
            .records
            .iter()
            .filter(|(school, _)| school == school_id)
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn count_teachers(&self, school_id: &str) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.teachers.get(school_id).copied().unwrap_or(0))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn school() -> SchoolInfo {
    SchoolInfo {
        name: "SMP Negeri 1 Cakung".to_string(),
        address: "Jl. Pendidikan No. 123, Jakarta Timur".to_string(),
        npsn: "20100123".to_string(),
        principal_name: "Drs. Ahmad Sulaiman, M.Pd.".to_string(),
        principal_nip: Some("196501011990031001".to_string()),
    }
}

/// One school, two classes, three students and a handful of May 2025 records.
pub fn seeded_store() -> MockAttendanceStore {
    MockAttendanceStore::new()
        .with_school(SCHOOL_ID, school())
        .with_school("school-2", SchoolInfo {
            name: "SMP Negeri 2".to_string(),
            ..school()
        })
        .with_class(SCHOOL_ID, "IX-A", Some("Ibu Rina Wati, S.Pd."))
        .with_class(SCHOOL_ID, "IX-B", None)
        .with_student(SCHOOL_ID, "stu-1", "Ani Lestari", "IX-A")
        .with_student(SCHOOL_ID, "stu-2", "Budi Santoso", "IX-A")
        .with_student(SCHOOL_ID, "stu-3", "Citra Dewi", "IX-B")
        .with_student("school-2", "stu-9", "Other School", "IX-A")
        .with_teachers(SCHOOL_ID, 4)
        .with_record(SCHOOL_ID, "stu-1", date(2025, 5, 12), "hadir")
        .with_record(SCHOOL_ID, "stu-2", date(2025, 5, 12), "sakit")
        .with_record(SCHOOL_ID, "stu-3", date(2025, 5, 12), "izin")
        .with_record(SCHOOL_ID, "stu-1", date(2025, 5, 13), "present")
        .with_record(SCHOOL_ID, "stu-2", date(2025, 5, 13), "alpha")
        .with_record(SCHOOL_ID, "stu-3", date(2025, 5, 13), "late")
        .with_record(SCHOOL_ID, "stu-1", date(2025, 4, 30), "hadir")
        .with_record("school-2", "stu-9", date(2025, 5, 12), "hadir")
}

pub fn test_state(store: Arc<MockAttendanceStore>) -> AppState {
    AppState::new_with_stores(
        store,
        Arc::new(MemoryPreferenceStore::new()),
        SECRET,
        Duration::from_secs(600),
    )
}

pub fn token(sub: &str, role: Role, student_id: Option<&str>) -> String {
    generate_access_token(sub, SCHOOL_ID, role, student_id, SECRET).unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
