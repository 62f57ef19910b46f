use crate::api::access::{AccessDenied, ForbiddenReason};
use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use crate::storage::StorageError;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("authentication required")]
    AuthenticationRequired,

    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("trip {0} not found")]
    TripNotFound(i32),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl ImageError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<AccessDenied> for ImageError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::AuthRequired => Self::AuthenticationRequired,
            AccessDenied::Forbidden(reason) => Self::Forbidden(reason),
        }
    }
}

impl From<sqlx::Error> for ImageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.into())
    }
}

fn log_error(error: &ImageError) {
    match error {
        ImageError::Validation { field, reason } => {
            info!("Image -> Validation failed: {field} {reason}");
        }
        ImageError::AuthenticationRequired => info!("Image -> Authentication required"),
        ImageError::Forbidden(reason) => warn!("Image -> Forbidden: {reason}"),
        ImageError::NotFound(what) => info!("Image -> Not found: {what}"),
        ImageError::TripNotFound(id) => info!("Image -> Trip not found: {id}"),
        ImageError::Storage(StorageError::InvalidFileName(name)) => {
            warn!("Image -> Rejected file name: {name}");
        }
        ImageError::Storage(e) => error!("Image -> Storage failure: {e}"),
        ImageError::Database(e) => error!("Image -> Database query failed: {e}"),
        ImageError::Internal(e) => error!("Image -> Internal error: {e:?}"),
    }
}

impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        log_error(&self);

        match self {
            Self::Validation { field, reason } => error_response(
                ErrorKind::ValidationError,
                format!("Invalid {field}: {reason}"),
                Some(field.as_str()),
            ),
            Self::Storage(StorageError::InvalidFileName(_)) => error_response(
                ErrorKind::ValidationError,
                "Invalid file name",
                Some("filename"),
            ),
            Self::AuthenticationRequired => error_response(
                ErrorKind::AuthenticationRequired,
                "You must be logged in to manage images",
                None,
            ),
            Self::Forbidden(ForbiddenReason::NotOwner) => error_response(
                ErrorKind::Forbidden,
                "You can only manage your own images and trips",
                None,
            ),
            Self::Forbidden(ForbiddenReason::RoleMismatch) => {
                error_response(ErrorKind::Forbidden, "Permission denied", None)
            }
            Self::NotFound(_) => {
                error_response(ErrorKind::NotFound, "Image not found", None)
            }
            Self::TripNotFound(_) => error_response(
                ErrorKind::NotFound,
                "The requested trip does not exist",
                None,
            ),
            Self::Database(_) => error_response(
                ErrorKind::PersistenceError,
                "Could not save image data to the database",
                None,
            ),
            Self::Storage(_) | Self::Internal(_) => error_response(
                ErrorKind::Internal,
                "An unexpected internal error occurred",
                None,
            ),
        }
    }
}
