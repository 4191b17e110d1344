//! Dashboard view models and layout preferences.

pub mod preferences;
pub mod views;

pub use preferences::{
    load_preferences, save_preferences, DashboardPreferences, MemoryPreferenceStore, PreferenceStore,
    WidgetKind, WidgetPlacement,
};
pub use views::{build_dashboard, DashboardError, DashboardView};
