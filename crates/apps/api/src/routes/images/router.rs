use crate::api_state::ApiContext;
use crate::routes::images::handlers::{
    delete_image_handler, get_cover_handler, get_image_handler, my_images_handler,
    trip_images_handler, upload_cover_handler, upload_images_handler,
};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn images_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/images/{filename}", get(get_image_handler))
        .route("/covers/{filename}", get(get_cover_handler))
        .route("/images/trip/{trip_id}", get(trip_images_handler))
}

/// `max_upload_bytes` bounds the whole multipart body of an upload.
pub fn images_protected_router(max_upload_bytes: usize) -> Router<ApiContext> {
    Router::new()
        .route(
            "/images/upload",
            post(upload_images_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/images/upload-cover",
            post(upload_cover_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/images/my-images", get(my_images_handler))
        // Shares the `/images/{filename}` route; the segment is parsed as an id here.
        .route("/images/{filename}", delete(delete_image_handler))
}
