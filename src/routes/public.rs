use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{appointments::BookingRequest, salons::PublicCatalog},
    error::AppResult,
    models::Appointment,
    response::ApiResponse,
    services::{booking_service, salon_service},
    state::AppState,
};

/// Endpoints reachable without a token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/salons/{id}", get(salon_catalog))
        .route("/bookings", post(create_booking))
}

#[utoipa::path(
    get,
    path = "/api/public/salons/{id}",
    params(("id" = Uuid, Path, description = "Salon id")),
    responses(
        (status = 200, description = "Active services, bookable collaborators and slots", body = ApiResponse<PublicCatalog>),
        (status = 404, description = "Unknown salon")
    ),
    tag = "Public"
)]
pub async fn salon_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicCatalog>>> {
    let resp = salon_service::public_catalog(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/public/bookings",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking requested, pending confirmation", body = ApiResponse<Appointment>),
        (status = 422, description = "Invalid slot, service or collaborator")
    ),
    tag = "Public"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = booking_service::create_public_booking(&state, payload).await?;
    Ok(Json(resp))
}
