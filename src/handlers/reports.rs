use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};

use crate::report::{ReportError, ReportFormat, ReportQuery, ReportRequest, ReportScope};
use crate::{AppState, ErrorResponse};

use super::{auth_error_response, authenticate, today};

fn failure_message(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Pdf => "Gagal mengunduh laporan PDF",
        ReportFormat::Xlsx => "Gagal mengunduh laporan Excel",
    }
}

pub(crate) fn report_error_response(error: &ReportError, format: ReportFormat) -> HttpResponse {
    match error {
        ReportError::InvalidRequest(message) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(message)),
        ReportError::SchoolNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Data sekolah tidak ditemukan"))
        }
        ReportError::StudentNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Data siswa tidak ditemukan"))
        }
        ReportError::Store(_) | ReportError::Pdf(_) | ReportError::Xlsx(_) => {
            log::error!("Report generation failed: {}", error);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(failure_message(format)))
        }
    }
}

async fn download(state: &AppState, school_id: &str, scope: ReportScope, format: ReportFormat) -> HttpResponse {
    let request = ReportRequest::new(school_id, scope, format, today());
    match state.reports.generate(&request).await {
        Ok(report) => HttpResponse::Ok()
            .content_type(report.content_type)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ))
            .body(report.bytes),
        Err(e) => report_error_response(&e, format),
    }
}

/// Staff only report: authenticate, check role, then render.
async fn staff_download(req: &HttpRequest, state: &AppState, scope: ReportScope, format: ReportFormat) -> HttpResponse {
    let claims = match authenticate(req, state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    if let Err(e) = claims.require_staff() {
        log::warn!("{} tried to download a staff report", claims.sub);
        return auth_error_response(&e);
    }
    download(state, &claims.school_id, scope, format).await
}

#[utoipa::path(
    get,
    path = "/api/reports/monthly",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Monthly report attachment", content_type = "application/pdf"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_monthly_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let format = query.format.unwrap_or_default();
    let scope = ReportScope::Monthly { month: query.month };
    staff_download(&req, &state, scope, format).await
}

#[utoipa::path(
    get,
    path = "/api/reports/class",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Class report attachment, the last 7 days unless a range is given"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_class_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let format = query.format.unwrap_or_default();
    let scope = ReportScope::Class {
        class_name: query.class_name.unwrap_or_default(),
        start: query.start,
        end: query.end,
    };
    staff_download(&req, &state, scope, format).await
}

#[utoipa::path(
    get,
    path = "/api/reports/student/{student_id}",
    tag = "Reports",
    params(
        ("student_id" = String, Path, description = "Student to report on"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Student report attachment"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Students may only download their own report", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_student_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let student_id = path.into_inner();
    let query = query.into_inner();
    let format = query.format.unwrap_or_default();

    let claims = match authenticate(&req, &state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    if let Err(e) = claims.require_student_access(&student_id) {
        log::warn!("{} tried to download the report of student {}", claims.sub, student_id);
        return auth_error_response(&e);
    }

    let scope = ReportScope::Student {
        student_id,
        month: query.month,
    };
    download(&state, &claims.school_id, scope, format).await
}

#[utoipa::path(
    get,
    path = "/api/reports/comprehensive",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Comprehensive report attachment"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_comprehensive_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let format = query.format.unwrap_or_default();
    let scope = ReportScope::Comprehensive { month: query.month };
    staff_download(&req, &state, scope, format).await
}

#[utoipa::path(
    get,
    path = "/api/reports/monthly-attendance",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Monthly attendance recap attachment"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_monthly_recap(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let format = query.format.unwrap_or_default();
    let scope = ReportScope::MonthlyRecap {
        month: query.month,
        class_name: query
            .class_name
            .filter(|c| !c.trim().is_empty() && c.trim() != crate::attendance::filter::ALL_CLASSES),
    };
    staff_download(&req, &state, scope, format).await
}
