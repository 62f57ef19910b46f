//! The JSON envelope shared by every endpoint: `{message, data|error, [count]}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a full result set together with its length.
    pub fn counted(message: impl Into<String>, data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            message: message.into(),
            data,
            count: Some(count),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Stable, machine-checkable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationError,
    AuthenticationRequired,
    Forbidden,
    NotFound,
    Conflict,
    PersistenceError,
    BadGateway,
    ServiceUnavailable,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::AuthenticationRequired => "authentication_required",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::PersistenceError => "persistence_error",
            Self::BadGateway => "bad_gateway",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Internal => "internal_error",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PersistenceError | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the error envelope. `field` is set for validation failures.
pub fn error_response(kind: ErrorKind, message: impl Into<String>, field: Option<&str>) -> Response {
    let message = message.into();
    let body = match field {
        Some(field) => json!({ "message": message, "error": kind.as_str(), "field": field }),
        None => json!({ "message": message, "error": kind.as_str() }),
    };
    (kind.status(), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_response_reports_length() {
        let response = ApiResponse::counted("ok", vec![1, 2, 3]);
        let value = serde_json::to_value(&response).expect("serializable");
        assert_eq!(value["count"], 3);
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn single_response_omits_count() {
        let value = serde_json::to_value(ApiResponse::new("ok", "x")).expect("serializable");
        assert!(value.get("count").is_none());
    }

    #[test]
    fn error_response_uses_kind_status() {
        let response = error_response(ErrorKind::Conflict, "taken", None);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let response = error_response(ErrorKind::ValidationError, "bad", Some("price"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = error_response(ErrorKind::ServiceUnavailable, "down", None);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
