use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::appointments::{AppointmentList, BookingRequest, UpdateAppointmentStatusRequest},
    error::AppResult,
    middleware::auth::CurrentScope,
    models::Appointment,
    response::ApiResponse,
    routes::params::AppointmentQuery,
    services::booking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments of one salon and day", body = ApiResponse<AppointmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = booking_service::list_appointments(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Appointment created", body = ApiResponse<Appointment>),
        (status = 403, description = "Salon or day outside the caller's calendar"),
        (status = 422, description = "Invalid slot, service or collaborator")
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<BookingRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = booking_service::create_staff_booking(&state, &scope, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<Appointment>),
        (status = 403, description = "Not allowed to act on this appointment"),
        (status = 422, description = "Transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn update_status(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = booking_service::update_status(&state, &scope, id, payload).await?;
    Ok(Json(resp))
}
