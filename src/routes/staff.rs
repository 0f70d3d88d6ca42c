use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        Deleted,
        staff::{InviteStaffRequest, StaffList, UpdateStaffRequest},
    },
    error::AppResult,
    middleware::auth::CurrentScope,
    models::StaffMember,
    response::ApiResponse,
    routes::params::SalonFilter,
    services::staff_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(invite_staff))
        .route("/{id}", put(update_staff).delete(remove_staff))
}

#[utoipa::path(
    get,
    path = "/api/staff",
    params(SalonFilter),
    responses(
        (status = 200, description = "Owner and collaborators of the resolved salons", body = ApiResponse<StaffList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(filter): Query<SalonFilter>,
) -> AppResult<Json<ApiResponse<StaffList>>> {
    let resp = staff_service::list_staff(&state, &scope, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = InviteStaffRequest,
    responses(
        (status = 200, description = "Collaborator invited", body = ApiResponse<StaffMember>),
        (status = 403, description = "Role or salon outside the caller's reach"),
        (status = 409, description = "Email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn invite_staff(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<InviteStaffRequest>,
) -> AppResult<Json<ApiResponse<StaffMember>>> {
    let resp = staff_service::invite_staff(&state, &scope, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(("id" = Uuid, Path, description = "Collaborator id")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Collaborator updated", body = ApiResponse<StaffMember>),
        (status = 403, description = "Not allowed to manage this collaborator")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_staff(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStaffRequest>,
) -> AppResult<Json<ApiResponse<StaffMember>>> {
    let resp = staff_service::update_staff(&state, &scope, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    params(("id" = Uuid, Path, description = "Collaborator id")),
    responses(
        (status = 200, description = "Collaborator removed", body = ApiResponse<Deleted>),
        (status = 403, description = "The owner account cannot be removed")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn remove_staff(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = staff_service::remove_staff(&state, &scope, id).await?;
    Ok(Json(resp))
}
