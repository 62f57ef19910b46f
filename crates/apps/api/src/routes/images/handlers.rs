use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{Response, StatusCode};
use axum::Extension;
use common_services::api::access::Subject;
use common_services::api::image::error::ImageError;
use common_services::api::image::interfaces::{UploadForm, UploadedFile};
use common_services::api::image::service::{
    delete_image, list_my_images, list_trip_images, serve_image, upload_field, upload_images,
};
use common_services::api::response::ApiResponse;
use common_services::database::app_user::User;
use common_services::database::image::{Image, ImageKind};
use tracing::{debug, instrument};

fn multipart_error(field: &str, error: &MultipartError) -> ImageError {
    ImageError::validation(field, error.body_text())
}

/// Reads the files under the upload field of `kind` plus an optional `trip_id`.
/// Other fields are ignored.
async fn read_upload_form(
    mut multipart: Multipart,
    kind: ImageKind,
) -> Result<UploadForm, ImageError> {
    let file_field = upload_field(kind);
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(file_field, &e))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == file_field {
            let original_name = field.file_name().unwrap_or("upload").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(file_field, &e))?;
            form.files.push(UploadedFile {
                original_name,
                content_type,
                bytes,
            });
        } else if name == "trip_id" {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error("trip_id", &e))?;
            let text = text.trim();
            if !text.is_empty() {
                let trip_id = text
                    .parse::<i32>()
                    .map_err(|_| ImageError::validation("trip_id", "must be an integer"))?;
                form.trip_id = Some(trip_id);
            }
        } else {
            debug!("Ignoring multipart field {name:?}");
        }
    }
    Ok(form)
}

/// Upload one or more images, optionally attached to one of the caller's trips.
#[utoipa::path(
    post,
    path = "/images/upload",
    tag = "Images",
    request_body(content_type = "multipart/form-data", description = "Files in `images`, optional `trip_id`."),
    responses(
        (status = 201, description = "Images stored.", body = Vec<Image>),
        (status = 400, description = "No file, or a file type that is not allowed."),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "The trip belongs to someone else."),
        (status = 404, description = "Trip not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, multipart), fields(user_id = user.id), err(Debug))]
pub async fn upload_images_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<Vec<Image>>), ImageError> {
    upload(context, &user, ImageKind::Image, multipart).await
}

/// Upload a single trip cover image.
#[utoipa::path(
    post,
    path = "/images/upload-cover",
    tag = "Images",
    request_body(content_type = "multipart/form-data", description = "One file in `cover_image`, optional `trip_id`."),
    responses(
        (status = 201, description = "Cover stored.", body = Vec<Image>),
        (status = 400, description = "No file, more than one file, or a file type that is not allowed."),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "The trip belongs to someone else."),
        (status = 404, description = "Trip not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, multipart), fields(user_id = user.id), err(Debug))]
pub async fn upload_cover_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<Vec<Image>>), ImageError> {
    upload(context, &user, ImageKind::Cover, multipart).await
}

async fn upload(
    context: ApiContext,
    user: &User,
    kind: ImageKind,
    multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<Vec<Image>>), ImageError> {
    let form = read_upload_form(multipart, kind).await?;
    let images = upload_images(
        &context.pool,
        &context.blobs,
        &context.settings.api,
        &Subject::from(user),
        kind,
        form,
    )
    .await?;
    let message = match kind {
        ImageKind::Image => "Images uploaded successfully",
        ImageKind::Cover => "Cover image uploaded successfully",
    };
    Ok((StatusCode::CREATED, ApiResponse::counted(message, images)))
}

/// Download an uploaded image.
#[utoipa::path(
    get,
    path = "/images/{filename}",
    tag = "Images",
    params(
        ("filename" = String, Path, description = "Generated file name of the image.")
    ),
    responses(
        (status = 200, description = "The image bytes."),
        (status = 400, description = "The file name is not a plain name."),
        (status = 404, description = "No such image."),
    )
)]
pub async fn get_image_handler(
    State(context): State<ApiContext>,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ImageError> {
    serve_image(&context.pool, &context.blobs, ImageKind::Image, &filename).await
}

/// Download an uploaded cover image.
#[utoipa::path(
    get,
    path = "/covers/{filename}",
    tag = "Images",
    params(
        ("filename" = String, Path, description = "Generated file name of the cover.")
    ),
    responses(
        (status = 200, description = "The image bytes."),
        (status = 400, description = "The file name is not a plain name."),
        (status = 404, description = "No such cover."),
    )
)]
pub async fn get_cover_handler(
    State(context): State<ApiContext>,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ImageError> {
    serve_image(&context.pool, &context.blobs, ImageKind::Cover, &filename).await
}

/// Images attached to a trip.
#[utoipa::path(
    get,
    path = "/images/trip/{trip_id}",
    tag = "Images",
    params(
        ("trip_id" = i32, Path, description = "The id of the trip.")
    ),
    responses(
        (status = 200, description = "The trip's images with their count.", body = Vec<Image>),
        (status = 401, description = "An invalid token was sent."),
        (status = 404, description = "Trip not found."),
    )
)]
pub async fn trip_images_handler(
    State(context): State<ApiContext>,
    _user: OptionalUser,
    Path(trip_id): Path<i32>,
) -> Result<ApiResponse<Vec<Image>>, ImageError> {
    let images = list_trip_images(&context.pool, trip_id).await?;
    Ok(ApiResponse::counted("Trip images retrieved successfully", images))
}

/// Images uploaded by the caller.
#[utoipa::path(
    get,
    path = "/images/my-images",
    tag = "Images",
    responses(
        (status = 200, description = "The caller's uploads with their count.", body = Vec<Image>),
        (status = 401, description = "Authentication required."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_images_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<ApiResponse<Vec<Image>>, ImageError> {
    let images = list_my_images(&context.pool, &Subject::from(&user)).await?;
    Ok(ApiResponse::counted("Your images retrieved successfully", images))
}

/// Delete one of the caller's uploads, row and file.
#[utoipa::path(
    delete,
    path = "/images/{image_id}",
    tag = "Images",
    params(
        ("image_id" = i32, Path, description = "The id of the image.")
    ),
    responses(
        (status = 200, description = "Image deleted.", body = Image),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller did not upload this image."),
        (status = 404, description = "No such image."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn delete_image_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(image_id): Path<i32>,
) -> Result<ApiResponse<Image>, ImageError> {
    let image = delete_image(
        &context.pool,
        &context.blobs,
        &Subject::from(&user),
        image_id,
    )
    .await?;
    Ok(ApiResponse::new("Image deleted successfully", image))
}
