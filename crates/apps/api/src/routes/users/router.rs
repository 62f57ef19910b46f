use crate::api_state::ApiContext;
use crate::routes::users::handlers::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
use axum::{
    Router,
    routing::{delete, get},
};

pub fn users_protected_router() -> Router<ApiContext> {
    Router::new().route(
        "/users/{user_id}",
        get(get_user_handler).put(update_user_handler),
    )
}

pub fn users_admin_router() -> Router<ApiContext> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/{user_id}", delete(delete_user_handler))
}
