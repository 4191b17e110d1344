//! Dashboard layout preferences.
//!
//! Preferences are plain data loaded from a [`PreferenceStore`] and passed
//! into view construction. Missing or unreadable entries fall back to the
//! stock layout.

use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::db::StoreError;
use crate::report::Validator;

pub const PREFERENCES_KEY: &str = "dashboard-layout";

/// Width of the widget grid.
pub const GRID_COLUMNS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Stats,
    Bar,
    Pie,
    Line,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WidgetPlacement {
    #[schema(example = "stats-1")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[schema(example = "Statistik Kehadiran")]
    pub title: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl WidgetPlacement {
    fn new(id: &str, kind: WidgetKind, title: &str, (x, y, w, h): (u32, u32, u32, u32)) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            x,
            y,
            w,
            h,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardPreferences {
    #[serde(default)]
    pub show_dynamic_dashboard: bool,
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetPlacement>,
}

impl Default for DashboardPreferences {
    fn default() -> Self {
        Self {
            show_dynamic_dashboard: false,
            widgets: default_widgets(),
        }
    }
}

pub fn default_widgets() -> Vec<WidgetPlacement> {
    vec![
        WidgetPlacement::new("stats-1", WidgetKind::Stats, "Statistik Kehadiran", (0, 0, 4, 2)),
        WidgetPlacement::new("bar-1", WidgetKind::Bar, "Kehadiran Bulanan", (4, 0, 8, 4)),
        WidgetPlacement::new("pie-1", WidgetKind::Pie, "Distribusi Kehadiran", (0, 2, 4, 4)),
        WidgetPlacement::new("line-1", WidgetKind::Line, "Tren Kehadiran", (0, 6, 6, 4)),
        WidgetPlacement::new("table-1", WidgetKind::Table, "Data Kehadiran Terkini", (6, 6, 6, 4)),
    ]
}

impl Validator for DashboardPreferences {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for widget in &self.widgets {
            if widget.id.trim().is_empty() {
                return Err("ID widget tidak boleh kosong".to_string());
            }
            if !seen.insert(widget.id.as_str()) {
                return Err(format!("ID widget '{}' digunakan lebih dari sekali", widget.id));
            }
            if widget.w == 0 || widget.h == 0 || widget.x.saturating_add(widget.w) > GRID_COLUMNS {
                return Err(format!("Ukuran widget '{}' tidak valid", widget.id));
            }
        }
        Ok(())
    }
}

/// Key-value store for per-user settings.
#[async_trait]
pub trait PreferenceStore {
    async fn load(&self, user_id: &str, key: &str) -> Result<Option<Value>, StoreError>;
    async fn save(&self, user_id: &str, key: &str, value: Value) -> Result<(), StoreError>;
}

/// In-process store, for tests and single instance deployments.
pub struct MemoryPreferenceStore {
    entries: Cache<(String, String), Value>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::new(10_000),
        }
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self, user_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(&(user_id.to_string(), key.to_string())).await)
    }

    async fn save(&self, user_id: &str, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries
            .insert((user_id.to_string(), key.to_string()), value)
            .await;
        Ok(())
    }
}

pub async fn load_preferences(
    store: &(dyn PreferenceStore + Send + Sync),
    user_id: &str,
) -> Result<DashboardPreferences, StoreError> {
    let Some(value) = store.load(user_id, PREFERENCES_KEY).await? else {
        return Ok(DashboardPreferences::default());
    };
    match serde_json::from_value(value) {
        Ok(preferences) => Ok(preferences),
        Err(e) => {
            log::warn!("Ignoring unreadable dashboard preferences of {}: {}", user_id, e);
            Ok(DashboardPreferences::default())
        }
    }
}

pub async fn save_preferences(
    store: &(dyn PreferenceStore + Send + Sync),
    user_id: &str,
    preferences: &DashboardPreferences,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(preferences)?;
    store.save(user_id, PREFERENCES_KEY, value).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let preferences = DashboardPreferences::default();
        assert!(!preferences.show_dynamic_dashboard);
        let ids: Vec<_> = preferences.widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["stats-1", "bar-1", "pie-1", "line-1", "table-1"]);
        assert_eq!(preferences.widgets[4].title, "Data Kehadiran Terkini");
        assert!(preferences.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let preferences: DashboardPreferences =
            serde_json::from_value(serde_json::json!({ "show_dynamic_dashboard": true })).unwrap();
        assert!(preferences.show_dynamic_dashboard);
        assert_eq!(preferences.widgets.len(), 5);
    }

    #[test]
    fn test_widget_type_is_serialized_as_type() {
        let value = serde_json::to_value(&default_widgets()[1]).unwrap();
        assert_eq!(value["type"], "bar");
    }

    #[test]
    fn test_rejects_duplicate_and_oversized_widgets() {
        let mut preferences = DashboardPreferences::default();
        preferences.widgets[1].id = "stats-1".to_string();
        assert!(preferences.validate().is_err());

        let mut preferences = DashboardPreferences::default();
        preferences.widgets[0].x = 10;
        assert!(preferences.validate().unwrap_err().contains("stats-1"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(load_preferences(&store, "user-1").await.unwrap(), DashboardPreferences::default());

        let mut preferences = DashboardPreferences::default();
        preferences.show_dynamic_dashboard = true;
        preferences.widgets.truncate(2);
        save_preferences(&store, "user-1", &preferences).await.unwrap();

        assert_eq!(load_preferences(&store, "user-1").await.unwrap(), preferences);
        assert_eq!(load_preferences(&store, "user-2").await.unwrap(), DashboardPreferences::default());
    }

    #[tokio::test]
    async fn test_unreadable_value_falls_back_to_default() {
        let store = MemoryPreferenceStore::new();
        store
            .save("user-1", PREFERENCES_KEY, serde_json::json!({ "widgets": 42 }))
            .await
            .unwrap();
        assert_eq!(load_preferences(&store, "user-1").await.unwrap(), DashboardPreferences::default());
    }
}
