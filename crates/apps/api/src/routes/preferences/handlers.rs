use crate::api_state::ApiContext;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::preference::error::PreferenceError;
use common_services::api::preference::interfaces::{
    AssignedPreferences, PreferencePayload, PreferenceSpec,
};
use common_services::api::preference::service::{
    assign_to_user, create_preference, delete_preference, get_preference, list_preferences,
    update_preference,
};
use common_services::api::response::ApiResponse;
use common_services::database::app_user::User;
use common_services::database::preference::Preference;
use tracing::instrument;

/// List every preference in the catalog.
#[utoipa::path(
    get,
    path = "/preferences",
    tag = "Preferences",
    responses(
        (status = 200, description = "All preferences with their count.", body = Vec<Preference>),
    )
)]
pub async fn list_preferences_handler(
    State(context): State<ApiContext>,
) -> Result<ApiResponse<Vec<Preference>>, PreferenceError> {
    let preferences = list_preferences(&context.pool).await?;
    Ok(ApiResponse::counted(
        "Preferences retrieved successfully",
        preferences,
    ))
}

#[utoipa::path(
    get,
    path = "/preferences/{preference_id}",
    tag = "Preferences",
    params(
        ("preference_id" = i32, Path, description = "The id of the preference.")
    ),
    responses(
        (status = 200, description = "The preference.", body = Preference),
        (status = 404, description = "Preference not found."),
    )
)]
pub async fn get_preference_handler(
    State(context): State<ApiContext>,
    Path(preference_id): Path<i32>,
) -> Result<ApiResponse<Preference>, PreferenceError> {
    let preference = get_preference(&context.pool, preference_id).await?;
    Ok(ApiResponse::new(
        "Preference retrieved successfully",
        preference,
    ))
}

/// Add a preference to the catalog. Admin only.
#[utoipa::path(
    post,
    path = "/preferences",
    tag = "Preferences",
    request_body = PreferencePayload,
    responses(
        (status = 201, description = "Preference created.", body = Preference),
        (status = 400, description = "Blank or too long name."),
        (status = 403, description = "Caller is not an admin."),
        (status = 409, description = "The name is taken."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context), err(Debug))]
pub async fn create_preference_handler(
    State(context): State<ApiContext>,
    Json(payload): Json<PreferencePayload>,
) -> Result<(StatusCode, ApiResponse<Preference>), PreferenceError> {
    let preference = create_preference(&context.pool, &payload).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Preference created successfully", preference),
    ))
}

/// Rename a preference. Admin only.
#[utoipa::path(
    put,
    path = "/preferences/{preference_id}",
    tag = "Preferences",
    params(
        ("preference_id" = i32, Path, description = "The id of the preference.")
    ),
    request_body = PreferencePayload,
    responses(
        (status = 200, description = "Preference updated.", body = Preference),
        (status = 400, description = "Blank or too long name."),
        (status = 403, description = "Caller is not an admin."),
        (status = 404, description = "Preference not found."),
        (status = 409, description = "The name is taken."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context), err(Debug))]
pub async fn update_preference_handler(
    State(context): State<ApiContext>,
    Path(preference_id): Path<i32>,
    Json(payload): Json<PreferencePayload>,
) -> Result<ApiResponse<Preference>, PreferenceError> {
    let preference = update_preference(&context.pool, preference_id, &payload).await?;
    Ok(ApiResponse::new("Preference updated successfully", preference))
}

/// Remove a preference and every link to it. Admin only.
#[utoipa::path(
    delete,
    path = "/preferences/{preference_id}",
    tag = "Preferences",
    params(
        ("preference_id" = i32, Path, description = "The id of the preference.")
    ),
    responses(
        (status = 200, description = "Preference deleted.", body = Preference),
        (status = 403, description = "Caller is not an admin."),
        (status = 404, description = "Preference not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context), err(Debug))]
pub async fn delete_preference_handler(
    State(context): State<ApiContext>,
    Path(preference_id): Path<i32>,
) -> Result<ApiResponse<Preference>, PreferenceError> {
    let preference = delete_preference(&context.pool, preference_id).await?;
    Ok(ApiResponse::new("Preference deleted successfully", preference))
}

/// Tag the caller with preferences, creating named ones that don't exist yet.
///
/// Assigning a preference the caller already has is a no-op.
#[utoipa::path(
    post,
    path = "/preferences/assign",
    tag = "Preferences",
    request_body = Vec<PreferenceSpec>,
    responses(
        (status = 201, description = "Preferences assigned.", body = AssignedPreferences),
        (status = 400, description = "A spec has neither a usable name nor a known id."),
        (status = 401, description = "Authentication required."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, specs), fields(user_id = user.id), err(Debug))]
pub async fn assign_preferences_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Json(specs): Json<Vec<PreferenceSpec>>,
) -> Result<(StatusCode, ApiResponse<AssignedPreferences>), PreferenceError> {
    let assigned = assign_to_user(&context.pool, user.id, &specs).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Preferences assigned successfully", assigned),
    ))
}
