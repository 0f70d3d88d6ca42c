use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Account;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sets the password of an invited collaborator and activates the account.
#[derive(Deserialize, Debug, ToSchema)]
pub struct AcceptInvitationRequest {
    pub email: String,
    /// Token received in the invitation email.
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub account: Account,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
