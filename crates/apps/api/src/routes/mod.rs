mod api_doc;
pub mod auth;
pub mod images;
pub mod preferences;
pub mod root;
pub mod trips;
pub mod users;

use crate::api_state::ApiContext;
use crate::auth::middlewares::require_role::require_role;
use crate::auth::middlewares::user::ApiUser;
use crate::auth::router::{auth_open_router, auth_protected_router, auth_public_router};
use crate::images::router::{images_protected_router, images_public_router};
use crate::preferences::router::{
    preferences_admin_router, preferences_protected_router, preferences_public_router,
};
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::trips::router::{trips_protected_router, trips_public_router};
use crate::users::router::{users_admin_router, users_protected_router};
use app_state::RateLimitingSettings;
use axum::Router;
use axum::middleware::{from_extractor_with_state, from_fn_with_state};
use color_eyre::Result;
use common_services::api::access::ADMIN_ONLY;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Result<Router> {
    Ok(Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(public_routes(&api_state.settings.api.rate_limiting)?)
        .merge(protected_routes(api_state.clone()))
        .merge(admin_routes(api_state.clone()))
        .with_state(api_state))
}

/// Routes without a token requirement. Handlers that accept an optional token
/// take their own extractor.
fn public_routes(rate_limiting: &RateLimitingSettings) -> Result<Router<ApiContext>> {
    Ok(Router::new()
        .merge(auth_public_router(rate_limiting)?)
        .merge(auth_open_router())
        .merge(root_public_router())
        .merge(trips_public_router())
        .merge(preferences_public_router())
        .merge(images_public_router()))
}

fn protected_routes(api_state: ApiContext) -> Router<ApiContext> {
    let max_upload_bytes = api_state.settings.uploads.max_upload_bytes;
    Router::new()
        .merge(auth_protected_router())
        .merge(trips_protected_router())
        .merge(preferences_protected_router())
        .merge(images_protected_router(max_upload_bytes))
        .merge(users_protected_router())
        .route_layer(from_extractor_with_state::<ApiUser, ApiContext>(api_state))
}

fn admin_routes(api_state: ApiContext) -> Router<ApiContext> {
    Router::new()
        .merge(preferences_admin_router())
        .merge(users_admin_router())
        .route_layer(from_fn_with_state(ADMIN_ONLY, require_role))
        .route_layer(from_extractor_with_state::<ApiUser, ApiContext>(api_state))
}
