use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::attendance::filter::{history, HistoryEntry, HistoryFilter};
use crate::attendance::{daily_breakdown, AttendanceQuery, DateRange, MonthPeriod, PeriodSummary};
use crate::report::validation::{validate_date_range, validate_month, ValidationError, ValidationErrors};
use crate::{AppState, ErrorResponse};

use super::{auth_error_response, authenticate, today};

/// Days covered by the history view when no range is given.
pub const HISTORY_DAYS: i64 = 30;

const FETCH_FAILED: &str = "Gagal mengambil data kehadiran";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    #[param(value_type = Option<String>, example = "2025-05-01")]
    pub start: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-05-31")]
    pub end: Option<NaiveDate>,
    /// Class name, `all` for every class
    #[param(example = "IX-A")]
    pub class_name: Option<String>,
    /// Case-insensitive part of a student name
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyQuery {
    /// Month as `yyyy-MM`, defaults to the current month
    #[param(example = "2025-05")]
    pub month: Option<String>,
    #[param(example = "IX-A")]
    pub class_name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Attendance history, newest first", body = [HistoryEntry]),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_attendance_history(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    let claims = match authenticate(&req, &state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    if let Err(e) = claims.require_staff() {
        return auth_error_response(&e);
    }

    let query = query.into_inner();
    let mut errors = ValidationErrors::new();
    validate_date_range(query.start, query.end, "start", &mut errors);
    if let Err(message) = errors.into_result() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    let end = query.end.unwrap_or_else(today);
    let start = match query.start.or_else(|| DateRange::trailing_days(end, HISTORY_DAYS).map(|r| r.start)) {
        Some(start) => start,
        None => {
            let message = ValidationError::date_out_of_range("end").to_string();
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
        }
    };
    let filter = HistoryFilter::new(query.class_name, query.search);

    let mut store_query = AttendanceQuery::for_range(DateRange::new(start, end));
    if let Some(class_name) = &filter.class_name {
        store_query = store_query.with_class(class_name.clone());
    }

    match state.store.fetch_attendance(&claims.school_id, &store_query).await {
        Ok(records) => HttpResponse::Ok().json(history(records, &filter)),
        Err(e) => {
            log::error!("Failed to fetch attendance history: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(FETCH_FAILED))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    tag = "Attendance",
    params(DailyQuery),
    responses(
        (status = 200, description = "One summary per day of the month", body = [PeriodSummary]),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_daily_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<DailyQuery>,
) -> impl Responder {
    let claims = match authenticate(&req, &state) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    if let Err(e) = claims.require_staff() {
        return auth_error_response(&e);
    }

    let query = query.into_inner();
    let mut errors = ValidationErrors::new();
    validate_month(query.month.as_deref(), "month", &mut errors);
    if let Err(message) = errors.into_result() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    let month = query
        .month
        .as_deref()
        .and_then(|m| MonthPeriod::parse(m).ok())
        .unwrap_or_else(|| MonthPeriod::of(today()));
    let filter = HistoryFilter::new(query.class_name, None);
    let mut store_query = AttendanceQuery::for_range(month.range());
    if let Some(class_name) = filter.class_name {
        store_query = store_query.with_class(class_name);
    }

    match state.store.fetch_attendance(&claims.school_id, &store_query).await {
        Ok(records) => HttpResponse::Ok().json(daily_breakdown(&records, month)),
        Err(e) => {
            log::error!("Failed to fetch daily attendance: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(FETCH_FAILED))
        }
    }
}
