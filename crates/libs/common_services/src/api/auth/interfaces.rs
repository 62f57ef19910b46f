use crate::database::app_user::{User, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Represents the data required to create a new user. Which roles are accepted
/// depends on who creates the user.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    #[schema(value_type = String, format = "password", example = "my-secret-password")]
    pub password: String,
    pub role: UserRole,
}

/// Represents the data required for user login.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct LoginUser {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(value_type = String, format = "password", example = "my-secret-password")]
    pub password: String,
}

/// Returned by register and login.
#[derive(Serialize, Debug, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub expiry: u64,
    pub user: User,
}

/// Represents the claims contained within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct AuthClaims {
    pub sub: i32,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
}

/// Profile changes a user can make to themselves. An empty name is ignored.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct UpdateProfile {
    #[serde(default)]
    pub name: Option<String>,
}

/// A role a new user can choose at registration.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RoleInfo {
    pub value: UserRole,
    pub label: &'static str,
    pub description: &'static str,
}

#[must_use]
pub fn registrable_roles() -> Vec<RoleInfo> {
    UserRole::SELF_REGISTRABLE
        .into_iter()
        .map(|role| match role {
            UserRole::TripOwner => RoleInfo {
                value: role,
                label: "Trip Owner",
                description: "Someone who creates and manages travel trips",
            },
            UserRole::Visitor | UserRole::Admin => RoleInfo {
                value: role,
                label: "Visitor",
                description: "Someone looking for travel experiences and trips",
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(role: UserRole, password: &str) -> CreateUser {
        CreateUser {
            name: "Ayu".to_owned(),
            email: "ayu@example.com".to_owned(),
            password: password.to_owned(),
            role,
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = registration(UserRole::Visitor, "12345")
            .validate()
            .expect_err("password too short");
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn field_checks_do_not_look_at_the_role() {
        assert!(registration(UserRole::Admin, "secret123").validate().is_ok());
    }

    #[test]
    fn trip_owner_registration_is_valid() {
        assert!(registration(UserRole::TripOwner, "123456").validate().is_ok());
    }

    #[test]
    fn roles_listing_excludes_admin() {
        let roles = registrable_roles();
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().all(|r| r.value != UserRole::Admin));
        assert_eq!(roles[1].label, "Trip Owner");
    }
}
