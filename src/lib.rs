use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod attendance;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod handlers;
pub mod report;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new("Unauthorized", message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new("Forbidden", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::dashboard::update_preferences,
        crate::handlers::attendance::get_attendance_history,
        crate::handlers::attendance::get_daily_attendance,
        crate::handlers::reports::download_monthly_report,
        crate::handlers::reports::download_class_report,
        crate::handlers::reports::download_student_report,
        crate::handlers::reports::download_comprehensive_report,
        crate::handlers::reports::download_monthly_recap,
        crate::handlers::health::health
    ),
    components(
        schemas(
            ErrorResponse,
            attendance::AttendanceRecord,
            attendance::AttendanceSummary,
            attendance::PeriodSummary,
            attendance::StudentAttendanceRow,
            attendance::filter::HistoryEntry,
            dashboard::DashboardPreferences,
            dashboard::WidgetPlacement,
            dashboard::WidgetKind,
            dashboard::DashboardView,
            dashboard::views::DashboardStats,
            dashboard::views::ClassDistribution,
            auth::Role,
            report::ReportFormat,
            handlers::health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Dashboard", description = "Role specific dashboards and layout preferences."),
        (name = "Attendance", description = "Attendance history and daily breakdown."),
        (name = "Reports", description = "PDF and XLSX attendance reports."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

/// Routes without middleware, shared by `run` and the integration tests.
/// Malformed query strings get the same JSON body as every other 400.
fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query string for {}: {}", req.path(), err);
    let message = format!("Parameter tidak valid: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    InternalError::from_response(err, response).into()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(web::scope("/api").configure(handlers::config))
        .route("/health", web::get().to(handlers::health::health));
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok(); // Load .env file

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let app_state = match AppState::new(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to connect to database. Please check your SUPABASE_DATABASE_URL in .env and ensure the database is running. Error: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("absensi_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("Failed to create Prometheus metrics middleware: {}", e)))?;

    let openapi = ApiDoc::openapi();
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "PUT", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(routes)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", openapi.clone()))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
