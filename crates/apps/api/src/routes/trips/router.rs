use crate::api_state::ApiContext;
use crate::routes::trips::handlers::{
    create_trip_handler, delete_trip_handler, get_trip_handler, list_trips_handler,
    my_trips_handler, seed_trips_handler, update_trip_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that decide about authentication themselves.
pub fn trips_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/trips", get(list_trips_handler))
        .route(
            "/trips/{trip_id}",
            get(get_trip_handler)
                .put(update_trip_handler)
                .delete(delete_trip_handler),
        )
}

pub fn trips_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/trips", post(create_trip_handler))
        .route("/trips/my-trips", get(my_trips_handler))
        .route("/trips/seed", post(seed_trips_handler))
}
