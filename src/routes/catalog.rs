use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        Deleted,
        catalog::{CloneCatalogRequest, CloneCatalogResult, ServiceList, UpsertServiceRequest},
    },
    error::AppResult,
    middleware::auth::CurrentScope,
    models::Service,
    response::ApiResponse,
    routes::params::ServiceQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/clone", post(clone_catalog))
        .route("/{id}", put(update_service).delete(delete_service))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(ServiceQuery),
    responses(
        (status = 200, description = "Services of a salon", body = ApiResponse<ServiceList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<ServiceQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = UpsertServiceRequest,
    responses(
        (status = 200, description = "Service created", body = ApiResponse<Service>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<UpsertServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::upsert_service(&state, &scope, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = UpsertServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Service>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::upsert_service(&state, &scope, Some(id), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = catalog_service::delete_service(&state, &scope, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/services/clone",
    request_body = CloneCatalogRequest,
    responses(
        (status = 200, description = "Catalog copied to every target salon", body = ApiResponse<CloneCatalogResult>),
        (status = 403, description = "Owner or manager of every salon involved only")
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn clone_catalog(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<CloneCatalogRequest>,
) -> AppResult<Json<ApiResponse<CloneCatalogResult>>> {
    let resp = catalog_service::clone_catalog(&state, &scope, payload).await?;
    Ok(Json(resp))
}
