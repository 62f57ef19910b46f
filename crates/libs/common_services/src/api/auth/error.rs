use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use tracing::{error, info, warn};

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InvalidCredentials,
    UserAlreadyExists,
    UserNotFound,
    Validation { field: String, reason: String },
    PermissionDenied { user_email: String, path: String },
    Internal(eyre::Report),
}

fn log_auth_failure(error: &AuthError) {
    match error {
        AuthError::MissingToken => warn!("Authentication failed: Missing Authorization token."),
        AuthError::InvalidToken => warn!("Authentication failed: Invalid token provided."),
        AuthError::InvalidCredentials => {
            info!("Authentication failed: Invalid credentials provided.");
        }
        AuthError::UserAlreadyExists => info!("Registration failed: User already exists."),
        AuthError::UserNotFound => warn!("Authentication failed: User from token not found."),
        AuthError::Validation { field, reason } => {
            info!("Auth request rejected: {field} {reason}");
        }
        AuthError::PermissionDenied { user_email, path } => {
            warn!("Authorization failed: User {user_email} is not allowed to access {path}");
        }
        AuthError::Internal(e) => error!("Internal server error during authentication: {e:?}"),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_auth_failure(&self);

        match self {
            Self::InvalidCredentials => error_response(
                ErrorKind::AuthenticationRequired,
                "Invalid email or password",
                None,
            ),
            Self::MissingToken | Self::InvalidToken | Self::UserNotFound => error_response(
                ErrorKind::AuthenticationRequired,
                "Authentication required",
                None,
            ),
            Self::UserAlreadyExists => error_response(
                ErrorKind::Conflict,
                "A user with this email address already exists",
                None,
            ),
            Self::Validation { field, reason } => error_response(
                ErrorKind::ValidationError,
                format!("Invalid {field}: {reason}"),
                Some(field.as_str()),
            ),
            Self::PermissionDenied { .. } => {
                error_response(ErrorKind::Forbidden, "Permission denied", None)
            }
            Self::Internal(report) if report.downcast_ref::<DbError>().is_some() => {
                error_response(ErrorKind::PersistenceError, "A database error occurred", None)
            }
            Self::Internal(_) => {
                error_response(ErrorKind::Internal, "An internal error occurred", None)
            }
        }
    }
}

// Lets `?` turn storage, hashing and token errors into `AuthError::Internal`.
impl<E> From<E> for AuthError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn token_problems_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::UserNotFound,
            AuthError::InvalidCredentials,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn duplicate_email_is_conflict() {
        assert_eq!(
            AuthError::UserAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn permission_denied_is_forbidden() {
        let err = AuthError::PermissionDenied {
            user_email: "a@b.io".to_owned(),
            path: "/users".to_owned(),
        };
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }
}
