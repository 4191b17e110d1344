use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::dashboard::{
    build_dashboard, load_preferences, save_preferences, DashboardError, DashboardPreferences, DashboardView,
};
use crate::report::{ReportError, Validator};
use crate::{AppState, ErrorResponse};

use super::{authenticate, today};

const LOAD_FAILED: &str = "Gagal memuat data dashboard";

#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard for the role of the session", body = DashboardView),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "School or student not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let claims = match authenticate(&req, &state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let school = match state.reports.fetch_school(&claims.school_id).await {
        Ok(school) => school,
        Err(ReportError::SchoolNotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Data sekolah tidak ditemukan"));
        }
        Err(e) => {
            log::error!("Failed to fetch school {}: {}", claims.school_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::internal_error(LOAD_FAILED));
        }
    };

    let preferences = match load_preferences(state.preferences.as_ref(), &claims.sub).await {
        Ok(preferences) => preferences,
        Err(e) => {
            log::error!("Failed to load dashboard preferences of {}: {}", claims.sub, e);
            DashboardPreferences::default()
        }
    };

    match build_dashboard(state.store.as_ref(), &school, &claims, preferences, today()).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(DashboardError::StudentNotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Data siswa tidak ditemukan"))
        }
        Err(e) => {
            log::error!("Failed to build dashboard: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(LOAD_FAILED))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/dashboard/preferences",
    tag = "Dashboard",
    request_body = DashboardPreferences,
    responses(
        (status = 200, description = "Saved preferences", body = DashboardPreferences),
        (status = 400, description = "Invalid layout", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_preferences(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<DashboardPreferences>,
) -> impl Responder {
    let claims = match authenticate(&req, &state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let preferences = body.into_inner();
    if let Err(message) = preferences.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    match save_preferences(state.preferences.as_ref(), &claims.sub, &preferences).await {
        Ok(()) => HttpResponse::Ok().json(preferences),
        Err(e) => {
            log::error!("Failed to save dashboard preferences of {}: {}", claims.sub, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error("Gagal menyimpan pengaturan dashboard"))
        }
    }
}
