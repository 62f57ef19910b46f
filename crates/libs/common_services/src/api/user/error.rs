use crate::api::access::{AccessDenied, ForbiddenReason};
use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("authentication required")]
    AuthenticationRequired,

    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    #[error("user {0} not found")]
    NotFound(i32),

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl From<AccessDenied> for UserError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::AuthRequired => Self::AuthenticationRequired,
            AccessDenied::Forbidden(reason) => Self::Forbidden(reason),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { field, reason } => {
                info!("User -> Validation failed: {field} {reason}");
                error_response(
                    ErrorKind::ValidationError,
                    format!("Invalid {field}: {reason}"),
                    Some(field.as_str()),
                )
            }
            Self::AuthenticationRequired => error_response(
                ErrorKind::AuthenticationRequired,
                "Authentication required",
                None,
            ),
            Self::Forbidden(reason) => {
                warn!("User -> Forbidden: {reason}");
                let message = match reason {
                    ForbiddenReason::RoleMismatch => "Only admins can change roles or other users",
                    ForbiddenReason::NotOwner => "You can only update your own account",
                };
                error_response(ErrorKind::Forbidden, message, None)
            }
            Self::NotFound(id) => {
                info!("User -> Not found: {id}");
                error_response(ErrorKind::NotFound, "User not found", None)
            }
            Self::Database(e) => {
                error!("User -> Database query failed: {e}");
                error_response(
                    ErrorKind::PersistenceError,
                    "Could not access users in the database",
                    None,
                )
            }
        }
    }
}
