//! Filtering for the attendance history view.

use serde::Serialize;
use utoipa::ToSchema;

use super::model::AttendanceRecord;
use super::status::display_label;

/// Class value meaning "no class filter".
pub const ALL_CLASSES: &str = "all";

#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub class_name: Option<String>,
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn new(class_name: Option<String>, search: Option<String>) -> Self {
        let class_name = class_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != ALL_CLASSES);
        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Self { class_name, search }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(class_name) = &self.class_name {
            if &record.class != class_name {
                return false;
            }
        }
        match &self.search {
            Some(needle) => record.student_name.to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// History row with the resolved status label.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    #[schema(example = "Hadir")]
    pub status_label: String,
}

/// Apply the filter and order newest first (date, then time).
pub fn history(mut records: Vec<AttendanceRecord>, filter: &HistoryFilter) -> Vec<HistoryEntry> {
    records.retain(|r| filter.matches(r));
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
    records
        .into_iter()
        .map(|record| {
            let status_label = display_label(&record.status);
            HistoryEntry { record, status_label }
        })
        .collect()
}
