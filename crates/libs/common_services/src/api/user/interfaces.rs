use crate::api::patch::Patch;
use crate::database::app_user::UserRole;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `PUT /users/{id}`. Only admins may change a role.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<UserRole>)]
    pub role: Patch<UserRole>,
}
