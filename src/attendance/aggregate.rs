//! Attendance aggregation shared by every report and dashboard view.
//!
//! Counting rule: each record is visited once and classified through
//! [`AttendanceStatus::from_code`]. A recognized status increments its bucket
//! and `total`; an unrecognized one is skipped entirely, so
//! `total == present + sick + permitted + absent` always holds.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

use super::model::{AttendanceRecord, Student};
use super::period::{trailing_weeks, MonthPeriod};
use super::status::AttendanceStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: u32,
    pub sick: u32,
    pub permitted: u32,
    pub absent: u32,
    pub total: u32,
}

impl AttendanceSummary {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Sick => self.sick += 1,
            AttendanceStatus::Permitted => self.permitted += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
        self.total += 1;
    }

    /// Classify a raw code and count it. Returns false when the code is unknown.
    pub fn record_code(&mut self, code: &str) -> bool {
        match AttendanceStatus::from_code(code) {
            Some(status) => {
                self.record(status);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, status: AttendanceStatus) -> u32 {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Sick => self.sick,
            AttendanceStatus::Permitted => self.permitted,
            AttendanceStatus::Absent => self.absent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Share of `status` in percent; 0.0 when nothing was counted.
    pub fn percent(&self, status: AttendanceStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 / self.total as f64 * 100.0
    }

    /// One-decimal percentage string, e.g. "72.5%".
    pub fn percent_label(&self, status: AttendanceStatus) -> String {
        format!("{:.1}%", self.percent(status))
    }

    /// Label for the total row: "100%", or "0.0%" when nothing was counted.
    pub fn total_percent_label(&self) -> String {
        if self.total == 0 {
            "0.0%".to_string()
        } else {
            "100%".to_string()
        }
    }

    /// Rounded share of present records, used by the dashboards.
    pub fn attendance_rate(&self) -> u32 {
        self.percent(AttendanceStatus::Present).round() as u32
    }

    pub fn merge(&mut self, other: &AttendanceSummary) {
        self.present += other.present;
        self.sick += other.sick;
        self.permitted += other.permitted;
        self.absent += other.absent;
        self.total += other.total;
    }
}

/// Count every record once.
pub fn summarize<'a, I>(records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary = AttendanceSummary::default();
    let mut skipped = 0usize;
    for record in records {
        if !summary.record_code(&record.status) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::debug!("Skipped {} attendance records with unrecognized status", skipped);
    }
    summary
}

/// Dimension used to group summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Student,
    Class,
    None,
}

/// One summary per partition key, ordered by key.
pub fn summarize_by(records: &[AttendanceRecord], partition: Partition) -> Vec<(String, AttendanceSummary)> {
    let mut groups: BTreeMap<String, AttendanceSummary> = BTreeMap::new();
    for record in records {
        let key = match partition {
            Partition::Student => record.student_id.clone(),
            Partition::Class => record.class.clone(),
            Partition::None => String::new(),
        };
        let entry = groups.entry(key).or_default();
        entry.record_code(&record.status);
    }
    groups.into_iter().collect()
}

/// Summary over a labelled slice of time (a day or a week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodSummary {
    #[schema(example = "Minggu 1")]
    pub label: String,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

/// Per-day summaries for the calendar view. Every day of the month is
/// present (zero-filled) and labelled "01".."31"; other months are ignored.
pub fn daily_breakdown(records: &[AttendanceRecord], month: MonthPeriod) -> Vec<PeriodSummary> {
    let mut days = vec![AttendanceSummary::default(); month.days() as usize];
    for record in records.iter().filter(|r| month.contains(r.date)) {
        if let Some(day) = days.get_mut(record.date.day0() as usize) {
            day.record_code(&record.status);
        }
    }
    days.into_iter()
        .enumerate()
        .map(|(index, summary)| PeriodSummary {
            label: format!("{:02}", index + 1),
            summary,
        })
        .collect()
}

/// Summaries for the `weeks` weeks ending with the week of `today`,
/// oldest first, labelled "Minggu 1".."Minggu n".
pub fn weekly_breakdown(records: &[AttendanceRecord], today: NaiveDate, weeks: usize) -> Vec<PeriodSummary> {
    let windows = trailing_weeks(today, weeks);
    let mut summaries = vec![AttendanceSummary::default(); windows.len()];
    for record in records {
        if let Some(index) = windows.iter().position(|w| w.contains(record.date)) {
            summaries[index].record_code(&record.status);
        }
    }
    summaries
        .into_iter()
        .enumerate()
        .map(|(index, summary)| PeriodSummary {
            label: format!("Minggu {}", index + 1),
            summary,
        })
        .collect()
}

/// Per-student counts for the roster tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentAttendanceRow {
    pub student_id: String,
    pub name: String,
    pub nisn: Option<String>,
    pub class: String,
    pub hadir: u32,
    pub sakit: u32,
    pub izin: u32,
    pub alpha: u32,
}

impl StudentAttendanceRow {
    pub fn for_student(student: &Student) -> Self {
        Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            nisn: student.nisn.clone(),
            class: student.class.clone(),
            hadir: 0,
            sakit: 0,
            izin: 0,
            alpha: 0,
        }
    }

    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.hadir += 1,
            AttendanceStatus::Sick => self.sakit += 1,
            AttendanceStatus::Permitted => self.izin += 1,
            AttendanceStatus::Absent => self.alpha += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.hadir + self.sakit + self.izin + self.alpha
    }

    pub fn summary(&self) -> AttendanceSummary {
        AttendanceSummary {
            present: self.hadir,
            sick: self.sakit,
            permitted: self.izin,
            absent: self.alpha,
            total: self.total(),
        }
    }
}

/// One row per roster student, in roster order. Records of students outside
/// the roster are ignored.
pub fn roster_rows(students: &[Student], records: &[AttendanceRecord]) -> Vec<StudentAttendanceRow> {
    let mut rows: Vec<StudentAttendanceRow> = students.iter().map(StudentAttendanceRow::for_student).collect();
    let index: HashMap<&str, usize> = students
        .iter()
        .enumerate()
        .map(|(position, student)| (student.id.as_str(), position))
        .collect();

    for record in records {
        let Some(&position) = index.get(record.student_id.as_str()) else {
            continue;
        };
        if let Some(status) = AttendanceStatus::from_code(&record.status) {
            rows[position].record(status);
        }
    }
    rows
}

/// Sum of roster rows.
pub fn totals(rows: &[StudentAttendanceRow]) -> AttendanceSummary {
    rows.iter().fold(AttendanceSummary::default(), |mut acc, row| {
        acc.merge(&row.summary());
        acc
    })
}
