use crate::api::auth::error::AuthError;
use crate::api::auth::hashing::{hash_password, verify_password};
use crate::api::auth::interfaces::{AuthResponse, CreateUser, LoginUser, UpdateProfile};
use crate::api::auth::token::issue_token;
use crate::api::validation::first_violation;
use crate::database::DbError;
use crate::database::app_user::{User, UserRole};
use crate::database::user_store::UserStore;
use app_state::AppSettings;
use sqlx::PgPool;
use tracing::{info, instrument};
use validator::Validate;

fn validate(payload: &impl Validate) -> Result<(), AuthError> {
    payload.validate().map_err(|errors| {
        let (field, reason) = first_violation(&errors);
        AuthError::Validation { field, reason }
    })
}

/// Field checks of a new user, then a check that its role is one of `allowed_roles`.
fn validate_new_user(payload: &CreateUser, allowed_roles: &[UserRole]) -> Result<(), AuthError> {
    validate(payload)?;
    if allowed_roles.contains(&payload.role) {
        return Ok(());
    }
    let allowed = allowed_roles
        .iter()
        .map(|role| format!("'{role}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(AuthError::Validation {
        field: "role".to_owned(),
        reason: format!("role must be one of {allowed}"),
    })
}

/// Authenticates a user based on email and password.
///
/// # Errors
///
/// * `AuthError::InvalidCredentials` if the email or password is incorrect.
/// * `AuthError::Internal` for database-related issues.
#[instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn authenticate_user(pool: &PgPool, payload: &LoginUser) -> Result<User, AuthError> {
    validate(payload)?;
    let user = UserStore::find_by_email_with_password(pool, &payload.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = verify_password(payload.password.as_ref(), &user.password)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user.into())
}

/// Creates a new user in the database. Registration passes
/// `UserRole::SELF_REGISTRABLE`; administrators pass `UserRole::ALL`.
///
/// # Errors
///
/// * `AuthError::Validation` when a field of the payload is invalid or the role is not allowed.
/// * `AuthError::UserAlreadyExists` if a user with the given email already exists.
/// * `AuthError::Internal` for hashing and other database errors.
#[instrument(skip(pool, payload), fields(email = %payload.email, role = %payload.role))]
pub async fn create_user(
    pool: &PgPool,
    payload: &CreateUser,
    allowed_roles: &[UserRole],
) -> Result<User, AuthError> {
    validate_new_user(payload, allowed_roles)?;
    let hashed = hash_password(payload.password.as_ref())?;
    info!(
        "Creating user email={}, name={}",
        payload.email, payload.name
    );

    match UserStore::create(pool, &payload.email, &payload.name, &hashed, payload.role).await {
        Ok(user) => Ok(user),
        Err(DbError::UniqueViolation(_)) => Err(AuthError::UserAlreadyExists),
        Err(err) => Err(err.into()),
    }
}

/// Issues an access token for `user` and bundles it with the user record.
///
/// # Errors
///
/// * `AuthError::Internal` if token encoding fails.
pub fn create_auth_response(settings: &AppSettings, user: User) -> Result<AuthResponse, AuthError> {
    let (token, expiry) = issue_token(
        &settings.secrets.jwt,
        settings.auth.access_token_expiry_minutes,
        &user,
    )?;
    Ok(AuthResponse {
        token,
        expiry,
        user,
    })
}

/// Applies a profile update for the calling user.
///
/// # Errors
///
/// * `AuthError::UserNotFound` if the user was deleted in the meantime.
/// * `AuthError::Internal` for database-related issues.
#[instrument(skip(pool, payload))]
pub async fn update_profile(
    pool: &PgPool,
    user_id: i32,
    payload: UpdateProfile,
) -> Result<User, AuthError> {
    let name = payload.name.filter(|name| !name.trim().is_empty());
    UserStore::update(pool, user_id, name, None)
        .await?
        .ok_or(AuthError::UserNotFound)
}
