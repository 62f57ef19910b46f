//! This module defines the HTTP handlers for authentication-related routes.

use crate::api_state::ApiContext;
use axum::{Extension, Json, extract::State, http::StatusCode};
use common_services::api::auth::error::AuthError;
use common_services::api::auth::interfaces::{
    AuthResponse, CreateUser, LoginUser, RoleInfo, UpdateProfile, registrable_roles,
};
use common_services::api::auth::service::{
    authenticate_user, create_auth_response, create_user, update_profile,
};
use common_services::api::response::ApiResponse;
use common_services::database::app_user::{User, UserRole};
use tracing::instrument;

/// Handles user login and returns a fresh access token.
///
/// # Errors
///
/// Returns `AuthError` if the user credentials are invalid or if there's a
/// problem creating the token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed email or empty password"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[instrument(skip(context, payload), err(Debug))]
pub async fn login(
    State(context): State<ApiContext>,
    Json(payload): Json<LoginUser>,
) -> Result<ApiResponse<AuthResponse>, AuthError> {
    let user = authenticate_user(&context.pool, &payload).await?;
    let response = create_auth_response(&context.settings, user)?;
    Ok(ApiResponse::new("Login successful", response))
}

/// Handles the registration of a new user and logs them in.
///
/// # Errors
///
/// Returns `AuthError` if a user with the provided email already exists, if the
/// payload fails validation, or if a database error occurs during user creation.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "User with this email already exists"),
    )
)]
#[instrument(skip(context, payload), err(Debug))]
pub async fn register(
    State(context): State<ApiContext>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, ApiResponse<AuthResponse>), AuthError> {
    let user = create_user(&context.pool, &payload, &UserRole::SELF_REGISTRABLE).await?;
    let response = create_auth_response(&context.settings, user)?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("User registered successfully", response),
    ))
}

/// Get current user info.
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user data", body = User),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(Extension(user): Extension<User>) -> ApiResponse<User> {
    ApiResponse::new("Profile retrieved successfully", user)
}

/// Update the name of the current user.
///
/// # Errors
///
/// Returns `AuthError` if the user no longer exists or the database fails.
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "Auth",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn put_profile(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateProfile>,
) -> Result<ApiResponse<User>, AuthError> {
    let user = update_profile(&context.pool, user.id, payload).await?;
    Ok(ApiResponse::new("Profile updated successfully", user))
}

/// Roles that can be picked at registration.
#[utoipa::path(
    get,
    path = "/auth/roles",
    tag = "Auth",
    responses(
        (status = 200, description = "Self-registrable roles", body = Vec<RoleInfo>),
    )
)]
pub async fn get_roles() -> ApiResponse<Vec<RoleInfo>> {
    ApiResponse::counted("Roles retrieved successfully", registrable_roles())
}
