use crate::api_state::ApiContext;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::access::Subject;
use common_services::api::auth::error::AuthError;
use common_services::api::auth::interfaces::CreateUser;
use common_services::api::auth::service::create_user;
use common_services::api::response::ApiResponse;
use common_services::api::user::error::UserError;
use common_services::api::user::interfaces::UpdateUserRequest;
use common_services::api::user::service::{delete_user, get_user, list_users, update_user};
use common_services::database::app_user::{User, UserRole};
use tracing::instrument;

/// List all users. Admin only.
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users with their count.", body = Vec<User>),
        (status = 403, description = "Caller is not an admin."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users_handler(
    State(context): State<ApiContext>,
) -> Result<ApiResponse<Vec<User>>, UserError> {
    let users = list_users(&context.pool).await?;
    Ok(ApiResponse::counted("Users retrieved successfully", users))
}

/// Create a user with any role, including admin. Admin only.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created.", body = User),
        (status = 400, description = "Invalid user data."),
        (status = 403, description = "Caller is not an admin."),
        (status = 409, description = "A user with this email already exists."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, admin, payload), fields(admin_id = admin.id), err(Debug))]
pub async fn create_user_handler(
    State(context): State<ApiContext>,
    Extension(admin): Extension<User>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, ApiResponse<User>), AuthError> {
    let user = create_user(&context.pool, &payload, &UserRole::ALL).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("User created successfully", user),
    ))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = i32, Path, description = "The id of the user.")
    ),
    responses(
        (status = 200, description = "The user.", body = User),
        (status = 401, description = "Authentication required."),
        (status = 404, description = "User not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_handler(
    State(context): State<ApiContext>,
    Path(user_id): Path<i32>,
) -> Result<ApiResponse<User>, UserError> {
    let user = get_user(&context.pool, user_id).await?;
    Ok(ApiResponse::new("User retrieved successfully", user))
}

/// Update a user. Users may rename themselves; only admins may edit others or change roles.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = i32, Path, description = "The id of the user.")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated.", body = User),
        (status = 400, description = "Empty name."),
        (status = 403, description = "Not allowed to make this change."),
        (status = 404, description = "User not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(by = user.id), err(Debug))]
pub async fn update_user_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiResponse<User>, UserError> {
    let updated = update_user(&context.pool, &Subject::from(&user), user_id, payload).await?;
    Ok(ApiResponse::new("User updated successfully", updated))
}

/// Delete a user. Admin only.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = i32, Path, description = "The id of the user.")
    ),
    responses(
        (status = 200, description = "User deleted.", body = User),
        (status = 403, description = "Caller is not an admin."),
        (status = 404, description = "User not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context), err(Debug))]
pub async fn delete_user_handler(
    State(context): State<ApiContext>,
    Path(user_id): Path<i32>,
) -> Result<ApiResponse<User>, UserError> {
    let user = delete_user(&context.pool, user_id).await?;
    Ok(ApiResponse::new("User deleted successfully", user))
}
