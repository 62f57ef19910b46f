use crate::api::access::{AccessDenied, ForbiddenReason};
use crate::api::response::{ErrorKind, error_response};
use crate::database::DbError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    #[error("overpass request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl From<AccessDenied> for SeedError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::AuthRequired => Self::AuthenticationRequired,
            AccessDenied::Forbidden(reason) => Self::Forbidden(reason),
        }
    }
}

impl From<sqlx::Error> for SeedError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.into())
    }
}

impl IntoResponse for SeedError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthenticationRequired => error_response(
                ErrorKind::AuthenticationRequired,
                "You must be logged in to seed trips",
                None,
            ),
            Self::Forbidden(reason) => {
                warn!("Seed -> Forbidden: {reason}");
                error_response(ErrorKind::Forbidden, "Only trip owners can seed trips", None)
            }
            Self::Upstream(e) => {
                warn!("Seed -> Overpass request failed: {e}");
                error_response(
                    ErrorKind::BadGateway,
                    "Failed to query OpenStreetMap",
                    None,
                )
            }
            Self::Database(e) => {
                error!("Seed -> Database query failed: {e}");
                error_response(
                    ErrorKind::PersistenceError,
                    "Could not add trips to the database",
                    None,
                )
            }
        }
    }
}
