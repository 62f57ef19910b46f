use crate::api_state::ApiContext;
use crate::routes::preferences::handlers::{
    assign_preferences_handler, create_preference_handler, delete_preference_handler,
    get_preference_handler, list_preferences_handler, update_preference_handler,
};
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn preferences_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/preferences", get(list_preferences_handler))
        .route("/preferences/{preference_id}", get(get_preference_handler))
}

pub fn preferences_protected_router() -> Router<ApiContext> {
    Router::new().route("/preferences/assign", post(assign_preferences_handler))
}

pub fn preferences_admin_router() -> Router<ApiContext> {
    Router::new()
        .route("/preferences", post(create_preference_handler))
        .route(
            "/preferences/{preference_id}",
            put(update_preference_handler).delete(delete_preference_handler),
        )
}
