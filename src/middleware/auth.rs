use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    scope::Scope,
    services::{auth_service, scope_service},
    state::AppState,
};

/// Principal id taken from a valid bearer token. The role claim is ignored;
/// authorization always goes through [`Scope`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub principal_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let state = AppState::from_ref(state);
        let principal_id = auth_service::verify_token(&state.auth, token)?;
        Ok(AuthUser { principal_id })
    }
}

/// Scope of the authenticated principal, resolved from storage on every request.
#[derive(Debug, Clone)]
pub struct CurrentScope(pub Scope);

impl<S> FromRequestParts<S> for CurrentScope
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let state = AppState::from_ref(state);
        let scope = scope_service::resolve_scope(&state, user.principal_id).await?;
        Ok(CurrentScope(scope))
    }
}
