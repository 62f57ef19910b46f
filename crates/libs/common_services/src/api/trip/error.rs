use crate::api::access::{AccessDenied, ForbiddenReason};
use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum TripError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("authentication required")]
    AuthenticationRequired,

    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    #[error("trip {0} not found")]
    NotFound(i32),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl TripError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<(String, String)> for TripError {
    fn from((field, reason): (String, String)) -> Self {
        Self::Validation { field, reason }
    }
}

impl From<JsonRejection> for TripError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("body", rejection.body_text())
    }
}

impl From<AccessDenied> for TripError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::AuthRequired => Self::AuthenticationRequired,
            AccessDenied::Forbidden(reason) => Self::Forbidden(reason),
        }
    }
}

impl From<sqlx::Error> for TripError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.into())
    }
}

fn log_error(error: &TripError) {
    match error {
        TripError::Validation { field, reason } => info!("Trip -> Validation failed: {field} {reason}"),
        TripError::AuthenticationRequired => info!("Trip -> Authentication required"),
        TripError::Forbidden(reason) => warn!("Trip -> Forbidden: {reason}"),
        TripError::NotFound(id) => info!("Trip -> Not found: {id}"),
        TripError::Database(e) => error!("Trip -> Database query failed: {e}"),
        TripError::Internal(e) => error!("Trip -> Internal error: {e:?}"),
    }
}

impl IntoResponse for TripError {
    fn into_response(self) -> Response {
        log_error(&self);

        match self {
            Self::Validation { field, reason } => error_response(
                ErrorKind::ValidationError,
                format!("Invalid {field}: {reason}"),
                Some(field.as_str()),
            ),
            Self::AuthenticationRequired => error_response(
                ErrorKind::AuthenticationRequired,
                "You must be logged in to manage trips",
                None,
            ),
            Self::Forbidden(ForbiddenReason::RoleMismatch) => error_response(
                ErrorKind::Forbidden,
                "Only trip owners can manage trips",
                None,
            ),
            Self::Forbidden(ForbiddenReason::NotOwner) => error_response(
                ErrorKind::Forbidden,
                "You can only modify your own trips",
                None,
            ),
            Self::NotFound(_) => error_response(
                ErrorKind::NotFound,
                "The requested trip does not exist",
                None,
            ),
            Self::Database(DbError::UniqueViolation(_)) => error_response(
                ErrorKind::Conflict,
                "The trip conflicts with existing data",
                None,
            ),
            Self::Database(_) => error_response(
                ErrorKind::PersistenceError,
                "Could not save changes to the database",
                None,
            ),
            Self::Internal(_) => error_response(
                ErrorKind::Internal,
                "An unexpected internal error occurred",
                None,
            ),
        }
    }
}
