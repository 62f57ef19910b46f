use crate::api_state::ApiContext;
use axum::extract::State;
use axum::response::Response;
use common_services::api::response::{ApiResponse, ErrorKind, error_response};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Root message")
    )
)]
pub async fn root() -> &'static str {
    "Trip booking API"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "API and database are reachable.", body = HealthStatus),
        (status = 503, description = "The database cannot be reached.")
    )
)]
pub async fn health_check(
    State(context): State<ApiContext>,
) -> Result<ApiResponse<HealthStatus>, Response> {
    match sqlx::query("SELECT 1").fetch_one(&context.pool).await {
        Ok(_) => Ok(ApiResponse::new(
            "Trip booking API is running",
            HealthStatus { status: "ok" },
        )),
        Err(e) => {
            error!("Health check failed: database connection error: {e}");
            Err(error_response(
                ErrorKind::ServiceUnavailable,
                "Database is unreachable",
                None,
            ))
        }
    }
}
