use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("preference {0} not found")]
    NotFound(i32),

    #[error("preference name already taken: {0}")]
    NameTaken(String),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl PreferenceError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for PreferenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.into())
    }
}

fn log_error(error: &PreferenceError) {
    match error {
        PreferenceError::Validation { field, reason } => {
            info!("Preference -> Validation failed: {field} {reason}");
        }
        PreferenceError::NotFound(id) => info!("Preference -> Not found: {id}"),
        PreferenceError::NameTaken(name) => info!("Preference -> Name taken: {name}"),
        PreferenceError::Database(e) => error!("Preference -> Database query failed: {e}"),
        PreferenceError::Internal(e) => error!("Preference -> Internal error: {e:?}"),
    }
}

impl IntoResponse for PreferenceError {
    fn into_response(self) -> Response {
        log_error(&self);

        match self {
            Self::Validation { field, reason } => error_response(
                ErrorKind::ValidationError,
                format!("Invalid {field}: {reason}"),
                Some(field.as_str()),
            ),
            Self::NotFound(_) => error_response(
                ErrorKind::NotFound,
                "The requested preference does not exist",
                None,
            ),
            Self::NameTaken(name) => error_response(
                ErrorKind::Conflict,
                format!("A preference named '{name}' already exists"),
                None,
            ),
            Self::Database(DbError::UniqueViolation(_)) => error_response(
                ErrorKind::Conflict,
                "A preference with this name already exists",
                None,
            ),
            Self::Database(_) => error_response(
                ErrorKind::PersistenceError,
                "Could not access preferences in the database",
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
