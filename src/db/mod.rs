//! Database module - AppState and store collaborators
//!
//! - `attendance` - Postgres implementation of [`AttendanceStore`]
//! - `preferences` - Postgres implementation of the dashboard preference store

mod attendance;
mod preferences;

pub use attendance::PgAttendanceStore;
pub use preferences::PgPreferenceStore;

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::attendance::{AttendanceQuery, AttendanceRecord, ClassInfo, SchoolInfo, Student};
use crate::config::AppConfig;
use crate::dashboard::PreferenceStore;
use crate::report::ReportService;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Tenant scoped read access to school data. Every call is filtered by
/// `school_id`.
#[async_trait]
pub trait AttendanceStore {
    async fn fetch_school_info(&self, school_id: &str) -> Result<Option<SchoolInfo>, StoreError>;

    /// Roster ordered by class then name, optionally limited to one class.
    async fn fetch_students(&self, school_id: &str, class_filter: Option<&str>) -> Result<Vec<Student>, StoreError>;

    async fn fetch_student(&self, school_id: &str, student_id: &str) -> Result<Option<Student>, StoreError>;

    async fn fetch_classes(&self, school_id: &str) -> Result<Vec<ClassInfo>, StoreError>;

    async fn fetch_attendance(
        &self,
        school_id: &str,
        query: &AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Newest records first.
    async fn recent_attendance(&self, school_id: &str, limit: i64) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn count_teachers(&self, school_id: &str) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore + Send + Sync>,
    pub preferences: Arc<dyn PreferenceStore + Send + Sync>,
    pub reports: ReportService,
    pub jwt_secret: String,
}

impl AppState {
    /// Connect to Postgres and wire the Postgres backed stores.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;

        if config.run_migrations {
            log::info!("Running database migrations");
            sqlx::migrate!("./migrations").run(&pool).await?;
        }

        Ok(Self::new_with_pool(pool, config))
    }

    pub fn new_with_pool(pool: PgPool, config: &AppConfig) -> Self {
        Self::new_with_stores(
            Arc::new(PgAttendanceStore::new(pool.clone())),
            Arc::new(PgPreferenceStore::new(pool)),
            &config.jwt_secret,
            config.school_cache_ttl,
        )
    }

    pub fn new_with_stores(
        store: Arc<dyn AttendanceStore + Send + Sync>,
        preferences: Arc<dyn PreferenceStore + Send + Sync>,
        jwt_secret: &str,
        school_cache_ttl: Duration,
    ) -> Self {
        let reports = ReportService::new(store.clone(), school_cache_ttl);
        Self {
            store,
            preferences,
            reports,
            jwt_secret: jwt_secret.to_string(),
        }
    }
}
