use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::schedules::{ScheduleList, ToggleScheduleRequest, ToggleScheduleResult},
    error::AppResult,
    middleware::auth::CurrentScope,
    response::ApiResponse,
    routes::params::ScheduleQuery,
    services::schedule_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules))
        .route("/toggle", post(toggle_schedule))
}

#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Presence tags of a salon", body = ApiResponse<ScheduleList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<ApiResponse<ScheduleList>>> {
    let resp = schedule_service::list_schedules(&state, &scope, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/schedules/toggle",
    request_body = ToggleScheduleRequest,
    responses(
        (status = 200, description = "Presence tag flipped", body = ApiResponse<ToggleScheduleResult>),
        (status = 403, description = "Owner or manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn toggle_schedule(
    State(state): State<AppState>,
    CurrentScope(scope): CurrentScope,
    Json(payload): Json<ToggleScheduleRequest>,
) -> AppResult<Json<ApiResponse<ToggleScheduleResult>>> {
    let resp = schedule_service::toggle_schedule(&state, &scope, payload).await?;
    Ok(Json(resp))
}
