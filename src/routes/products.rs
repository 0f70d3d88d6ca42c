use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        Deleted,
        catalog::{ProductList, StockAdjustRequest, UpsertProductRequest},
    },
    error::AppResult,
    middleware::auth::CurrentScope,
    models::Product,
    response::ApiResponse,
    routes::params::{ProductQuery, SalonFilter},
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/critical", get(list_critical_stock))
        .route("/{id}", put(update_product).delete(delete_product))
        .route("/{id}/stock", patch(adjust_stock))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products of a salon", body = ApiResponse<ProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = inventory_service::list_products(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/critical",
    params(SalonFilter),
    responses(
        (status = 200, description = "Products at or below their alert threshold", body = ApiResponse<ProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_critical_stock(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(filter): Query<SalonFilter>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = inventory_service::list_critical_stock(&state, &scope, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = UpsertProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<UpsertProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::upsert_product(&state, &scope, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpsertProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::upsert_product(&state, &scope, Some(id), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = inventory_service::delete_product(&state, &scope, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted, never below zero", body = ApiResponse<Product>),
        (status = 409, description = "Stock kept changing concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::adjust_stock(&state, &scope, id, payload).await?;
    Ok(Json(resp))
}
