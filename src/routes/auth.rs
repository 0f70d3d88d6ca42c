use axum::{Json, Router, extract::State, routing::{get, post}};

use crate::{
    dto::auth::{AcceptInvitationRequest, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    middleware::auth::CurrentScope,
    response::ApiResponse,
    scope::Scope,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/accept-invitation", post(accept_invitation))
        .route("/scope", get(current_scope))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register an organization owner", body = ApiResponse<LoginResponse>),
        (status = 409, description = "Email already taken"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::register_owner(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/accept-invitation",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Activate an invited collaborator", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Unknown invitation or wrong token")
    ),
    tag = "Auth"
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInvitationRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::accept_invitation(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/scope",
    responses(
        (status = 200, description = "Resolved scope of the caller", body = ApiResponse<Scope>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn current_scope(CurrentScope(scope): CurrentScope) -> Json<ApiResponse<Scope>> {
    Json(ApiResponse::success("Scope", scope, None))
}
