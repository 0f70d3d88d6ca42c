use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        Deleted,
        salons::{SalonList, UpsertSalonRequest},
    },
    error::AppResult,
    middleware::auth::CurrentScope,
    models::Salon,
    response::ApiResponse,
    services::salon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_salons).post(create_salon))
        .route(
            "/{id}",
            get(get_salon).put(update_salon).delete(delete_salon),
        )
}

#[utoipa::path(
    get,
    path = "/api/salons",
    responses(
        (status = 200, description = "Salons in the caller's scope", body = ApiResponse<SalonList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn list_salons(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
) -> AppResult<Json<ApiResponse<SalonList>>> {
    let resp = salon_service::list_salons(&state, &scope).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/salons/{id}",
    params(("id" = Uuid, Path, description = "Salon id")),
    responses(
        (status = 200, description = "Salon", body = ApiResponse<Salon>),
        (status = 404, description = "Not found or outside scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn get_salon(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Salon>>> {
    let resp = salon_service::get_salon(&state, &scope, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/salons",
    request_body = UpsertSalonRequest,
    responses(
        (status = 200, description = "Salon created", body = ApiResponse<Salon>),
        (status = 403, description = "Owner or manager only"),
        (status = 422, description = "Invalid input")
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn create_salon(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<UpsertSalonRequest>,
) -> AppResult<Json<ApiResponse<Salon>>> {
    let resp = salon_service::upsert_salon(&state, &scope, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/salons/{id}",
    params(("id" = Uuid, Path, description = "Salon id")),
    request_body = UpsertSalonRequest,
    responses(
        (status = 200, description = "Salon updated", body = ApiResponse<Salon>),
        (status = 403, description = "Owner or manager of this salon only")
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn update_salon(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertSalonRequest>,
) -> AppResult<Json<ApiResponse<Salon>>> {
    let resp = salon_service::upsert_salon(&state, &scope, Some(id), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/salons/{id}",
    params(("id" = Uuid, Path, description = "Salon id")),
    responses(
        (status = 200, description = "Salon deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Owner only")
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn delete_salon(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = salon_service::delete_salon(&state, &scope, id).await?;
    Ok(Json(resp))
}
