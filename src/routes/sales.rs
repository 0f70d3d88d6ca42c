use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::sales::{CancelSaleRequest, RecordSaleRequest, SaleList},
    error::AppResult,
    middleware::auth::CurrentScope,
    models::Sale,
    response::ApiResponse,
    routes::params::{SalesQuery, SalonFilter},
    services::sale_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/recent", get(recent_sales))
        .route("/{id}/cancel", post(cancel_sale))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Sales in range; staff only see their own", body = ApiResponse<SaleList>),
        (status = 422, description = "Invalid date range")
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    let resp = sale_service::list_sales(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sales/recent",
    params(SalonFilter),
    responses(
        (status = 200, description = "Latest sales", body = ApiResponse<SaleList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn recent_sales(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(filter): Query<SalonFilter>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    let resp = sale_service::recent_sales(&state, &scope, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = RecordSaleRequest,
    responses(
        (status = 200, description = "Sale recorded", body = ApiResponse<Sale>),
        (status = 403, description = "Salon outside scope"),
        (status = 422, description = "Invalid sale lines")
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<RecordSaleRequest>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let resp = sale_service::record_sale(&state, &scope, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sales/{id}/cancel",
    params(("id" = Uuid, Path, description = "Sale id")),
    request_body = CancelSaleRequest,
    responses(
        (status = 200, description = "Sale cancelled", body = ApiResponse<Sale>),
        (status = 403, description = "Owner or manager only"),
        (status = 409, description = "Sale already cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn cancel_sale(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelSaleRequest>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let resp = sale_service::cancel_sale(&state, &scope, id, payload).await?;
    Ok(Json(resp))
}
