use crate::api_state::ApiContext;
use crate::auth::handlers::{get_profile, get_roles, login, put_profile, register};
use app_state::RateLimitingSettings;
use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Result, eyre};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tracing::info;

pub fn auth_public_router(rate_limiting: &RateLimitingSettings) -> Result<Router<ApiContext>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rate_limiting.req_per_second)
        .burst_size(rate_limiting.burst_size)
        .finish()
        .ok_or_else(|| eyre!("Could not create rate-limiting governor."))?;

    info!(
        "Using request limits: req_per_second={}, burst_size={}",
        rate_limiting.req_per_second, rate_limiting.burst_size
    );

    Ok(Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(GovernorLayer::new(governor_conf)))
}

pub fn auth_open_router() -> Router<ApiContext> {
    Router::new().route("/auth/roles", get(get_roles))
}

pub fn auth_protected_router() -> Router<ApiContext> {
    Router::new().route("/auth/profile", get(get_profile).put(put_profile))
}
