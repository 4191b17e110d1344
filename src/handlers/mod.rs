//! HTTP handlers, all mounted under `/api` except `/health`.

pub mod attendance;
pub mod dashboard;
pub mod health;
pub mod reports;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;

use crate::auth::{validate_request_token, AuthError, Claims};
use crate::{AppState, ErrorResponse};

/// Resolve the bearer session or produce the 401 response.
pub(crate) fn authenticate(req: &HttpRequest, state: &AppState) -> Result<Claims, HttpResponse> {
    validate_request_token(req, &state.jwt_secret).map_err(|e| auth_error_response(&e))
}

pub(crate) fn auth_error_response(error: &AuthError) -> HttpResponse {
    match error {
        AuthError::Forbidden => {
            HttpResponse::Forbidden().json(ErrorResponse::forbidden("Anda tidak memiliki akses ke data ini"))
        }
        other => HttpResponse::Unauthorized().json(ErrorResponse::unauthorized(&other.to_string())),
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/dashboard").route(web::get().to(dashboard::get_dashboard)),
    )
    .service(
        web::resource("/dashboard/preferences").route(web::put().to(dashboard::update_preferences)),
    )
    .service(
        web::resource("/attendance").route(web::get().to(attendance::get_attendance_history)),
    )
    .service(
        web::resource("/attendance/daily").route(web::get().to(attendance::get_daily_attendance)),
    )
    .service(
        web::resource("/reports/monthly").route(web::get().to(reports::download_monthly_report)),
    )
    .service(
        web::resource("/reports/class").route(web::get().to(reports::download_class_report)),
    )
    .service(
        web::resource("/reports/student/{student_id}")
            .route(web::get().to(reports::download_student_report)),
    )
    .service(
        web::resource("/reports/comprehensive")
            .route(web::get().to(reports::download_comprehensive_report)),
    )
    .service(
        web::resource("/reports/monthly-attendance")
            .route(web::get().to(reports::download_monthly_recap)),
    );
}
