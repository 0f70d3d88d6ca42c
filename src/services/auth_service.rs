use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::{OsRng, RngCore};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AcceptInvitationRequest, Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::{
        enums::{Role, StaffStatus},
        profiles, staff, Profiles, Staff,
    },
    error::{AppError, AppResult},
    models::Account,
    response::ApiResponse,
    state::{AppState, AuthSettings},
};

const MIN_PASSWORD_LEN: usize = 8;
const INVITATION_TOKEN_BYTES: usize = 32;

/// Plain invitation token for the email and the hash stored on the staff row.
pub struct InvitationToken {
    pub token: String,
    pub hash: String,
}

pub async fn register_owner(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload;
    let email = normalize_email(&email)?;
    validate_password(&password)?;
    if name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    ensure_email_available(state, &email).await?;

    let profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        name: Set(name.trim().to_string()),
        password_hash: Set(hash_password(&password)?),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        Some(profile.id),
        "owner_register",
        "profiles",
        serde_json::json!({ "profile_id": profile.id }),
    )
    .await;

    let account = Account {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        role: Role::Owner,
    };
    Ok(ApiResponse::success(
        "Owner registered",
        token_response(&state.auth, account)?,
        None,
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let account = if let Some(profile) = Profiles::find()
        .filter(profiles::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
    {
        verify_password(&password, &profile.password_hash)?;
        Account {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            role: Role::Owner,
        }
    } else {
        let member = Staff::find()
            .filter(staff::Column::Email.eq(email.as_str()))
            .one(&state.orm)
            .await?
            .ok_or_else(invalid_credentials)?;
        if member.status == StaffStatus::Invited {
            return Err(AppError::Unauthorized(
                "Invitation has not been accepted yet".into(),
            ));
        }
        let hash = member.password_hash.as_deref().ok_or_else(invalid_credentials)?;
        verify_password(&password, hash)?;
        Account {
            id: member.id,
            email: member.email,
            name: member.name,
            role: member.role,
        }
    };

    audit::record(
        &state.orm,
        Some(account.id),
        "login",
        if account.role == Role::Owner { "profiles" } else { "staff" },
        serde_json::json!({ "account_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        token_response(&state.auth, account)?,
        None,
    ))
}

pub async fn accept_invitation(
    state: &AppState,
    payload: AcceptInvitationRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let AcceptInvitationRequest {
        email,
        token,
        password,
    } = payload;
    let email = email.trim().to_lowercase();
    validate_password(&password)?;

    let member = Staff::find()
        .filter(staff::Column::Email.eq(email.as_str()))
        .filter(staff::Column::Status.eq(StaffStatus::Invited))
        .one(&state.orm)
        .await?
        .ok_or_else(invalid_invitation)?;
    let stored = member
        .invitation_token_hash
        .as_deref()
        .ok_or_else(invalid_invitation)?;
    if token.trim().is_empty() || verify_password(token.trim(), stored).is_err() {
        tracing::warn!(staff_id = %member.id, "invitation accepted with a wrong token");
        return Err(invalid_invitation());
    }

    let mut active: staff::ActiveModel = member.into();
    active.password_hash = Set(Some(hash_password(&password)?));
    active.invitation_token_hash = Set(None);
    active.status = Set(StaffStatus::Active);
    let member = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(member.id),
        "invitation_accept",
        "staff",
        serde_json::json!({ "staff_id": member.id }),
    )
    .await;

    let account = Account {
        id: member.id,
        email: member.email,
        name: member.name,
        role: member.role,
    };
    Ok(ApiResponse::success(
        "Invitation accepted",
        token_response(&state.auth, account)?,
        None,
    ))
}

pub fn issue_token(settings: &AuthSettings, principal_id: Uuid, role: Role) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(settings.token_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: principal_id.to_string(),
        role: role.as_str().to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Validates signature and expiry and returns the principal id carried by `token`.
pub fn verify_token(settings: &AuthSettings, token: &str) -> AppResult<Uuid> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid principal id in token".into()))
}

/// Random hex token sent with an invitation. Only its argon2 hash is stored,
/// and verification goes through the same constant-time check as passwords.
pub fn issue_invitation_token() -> AppResult<InvitationToken> {
    let mut bytes = [0u8; INVITATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_password(&token)?;
    Ok(InvitationToken { token, hash })
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid_credentials())
}

fn token_response(settings: &AuthSettings, account: Account) -> AppResult<LoginResponse> {
    Ok(LoginResponse {
        token: issue_token(settings, account.id, account.role)?,
        token_type: "Bearer".to_string(),
        account,
    })
}

fn invalid_invitation() -> AppError {
    AppError::Unauthorized("Invalid or expired invitation".into())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::validation("email is invalid")),
    }
}

/// Emails are unique across owners and collaborators.
pub(crate) async fn ensure_email_available(state: &AppState, email: &str) -> AppResult<()> {
    let taken_by_owner = Profiles::find()
        .filter(profiles::Column::Email.eq(email))
        .one(&state.orm)
        .await?
        .is_some();
    let taken_by_staff = Staff::find()
        .filter(staff::Column::Email.eq(email))
        .one(&state.orm)
        .await?
        .is_some();
    if taken_by_owner || taken_by_staff {
        return Err(AppError::Conflict("Email is already taken".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
        }
    }

    #[test]
    fn issued_token_round_trips_principal() {
        let id = Uuid::new_v4();
        let token = issue_token(&settings(), id, Role::Manager).unwrap();
        assert_eq!(verify_token(&settings(), &token).unwrap(), id);

        let other = AuthSettings {
            jwt_secret: "another".into(),
            token_ttl_hours: 1,
        };
        assert!(matches!(
            verify_token(&other, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn invitation_tokens_are_random_and_hashed() {
        let first = issue_invitation_token().unwrap();
        let second = issue_invitation_token().unwrap();
        assert_eq!(first.token.len(), INVITATION_TOKEN_BYTES * 2);
        assert_ne!(first.token, second.token);
        assert!(!first.hash.contains(&first.token));
        assert!(verify_password(&first.token, &first.hash).is_ok());
        assert!(verify_password(&second.token, &first.hash).is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Salon.FR ").unwrap(), "ana@salon.fr");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@salon.fr").is_err());
    }
}
