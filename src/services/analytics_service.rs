use chrono::Utc;

use crate::{
    analytics::{
        self, DashboardReport, attendance_csv, attendance_report, build_dashboard, visible_sales,
        revenue::DEFAULT_TOP_ITEMS,
    },
    dto::analytics::AttendanceReport,
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::{AttendanceQuery, DashboardQuery},
    scope::Scope,
    services::{sale_service, salon_service, staff_service},
    state::AppState,
};

pub async fn dashboard(
    state: &AppState,
    scope: &Scope,
    query: DashboardQuery,
) -> AppResult<ApiResponse<DashboardReport>> {
    let range = query.range()?;
    let sales = sale_service::fetch_sales(state, scope, &range, query.salon_id, false).await?;
    let salons = salon_service::fetch_salons(state, &scope.resolve_salons(query.salon_id)).await?;
    let report = build_dashboard(
        scope,
        &sales,
        &salons,
        &range,
        query.salon_id,
        query.top.unwrap_or(DEFAULT_TOP_ITEMS),
    );
    Ok(ApiResponse::success("Dashboard", report, Some(Meta::empty())))
}

pub async fn attendance(
    state: &AppState,
    scope: &Scope,
    query: AttendanceQuery,
) -> AppResult<ApiResponse<AttendanceReport>> {
    let range = query.range()?;
    let rows = attendance_rows(state, scope, &query).await?;
    Ok(ApiResponse::success(
        "Attendance",
        AttendanceReport {
            range,
            day_count: range.inclusive_day_count(),
            rows,
        },
        Some(Meta::empty()),
    ))
}

/// Attendance report rendered as CSV, ready to download.
pub async fn attendance_export(
    state: &AppState,
    scope: &Scope,
    query: AttendanceQuery,
) -> AppResult<String> {
    let range = query.range()?;
    let rows = attendance_rows(state, scope, &query).await?;
    let salons = salon_service::fetch_salons(state, &scope.resolve_salons(None)).await?;
    Ok(attendance_csv(&rows, &salons, &range, query.include_tips))
}

async fn attendance_rows(
    state: &AppState,
    scope: &Scope,
    query: &AttendanceQuery,
) -> AppResult<Vec<analytics::AttendanceRow>> {
    let range = query.range()?;
    let staff = staff_service::fetch_staff(state, scope, query.salon_id).await?;
    let sales = sale_service::fetch_sales(state, scope, &range, query.salon_id, false).await?;
    let visible = visible_sales(scope, &sales, &range, query.salon_id);
    Ok(attendance_report(
        scope,
        &staff,
        &visible,
        &range,
        Utc::now().date_naive(),
    ))
}
