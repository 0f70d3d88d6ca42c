use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::{
    analytics::DashboardReport,
    dto::analytics::AttendanceReport,
    error::AppResult,
    middleware::auth::CurrentScope,
    response::ApiResponse,
    routes::params::{AttendanceQuery, DashboardQuery},
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/attendance", get(attendance))
        .route("/attendance/export", get(attendance_export))
}

#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Revenue, tips and item mix over a period", body = ApiResponse<DashboardReport>),
        (status = 422, description = "Invalid date range")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<ApiResponse<DashboardReport>>> {
    let resp = analytics_service::dashboard(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Activity of each collaborator derived from sales", body = ApiResponse<AttendanceReport>)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn attendance(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<ApiResponse<AttendanceReport>>> {
    let resp = analytics_service::attendance(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/attendance/export",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance report as semicolon separated CSV", content_type = "text/csv", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn attendance_export(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<impl IntoResponse> {
    let filename = format!("attendance_{}_{}.csv", query.start, query.end);
    let csv = analytics_service::attendance_export(&state, &scope, query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
