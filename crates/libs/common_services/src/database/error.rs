use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(sqlx::Error),

    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(sqlx::error::DatabaseError::is_unique_violation);
        if is_unique {
            Self::UniqueViolation(err)
        } else {
            Self::Sqlx(err)
        }
    }
}
