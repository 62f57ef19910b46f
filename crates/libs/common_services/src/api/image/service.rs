use crate::api::access::{ANY_ROLE, ForbiddenReason, Ownership, Subject, ensure};
use crate::api::image::error::ImageError;
use crate::api::image::interfaces::{
    UploadForm, content_type_for, generate_file_name, is_allowed_mime,
};
use crate::database::image::{Image, ImageKind, NewImage};
use crate::database::image_store::ImageStore;
use crate::database::trip_store::TripStore;
use crate::storage::BlobStore;
use app_state::ApiSettings;
use axum::body::Body;
use axum::http::{HeaderValue, Response, StatusCode, header};
use chrono::Utc;
use color_eyre::Report;
use sqlx::PgPool;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::{info, instrument, warn};

/// Multipart field that carries the files of an upload.
pub const fn upload_field(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Image => "images",
        ImageKind::Cover => "cover_image",
    }
}

/// Stores uploaded files and records them. Every file is checked before anything is
/// written; if recording fails, the blobs written so far are removed again.
#[instrument(skip(pool, blobs, api, subject, form), fields(user_id = subject.id, files = form.files.len()))]
pub async fn upload_images(
    pool: &PgPool,
    blobs: &BlobStore,
    api: &ApiSettings,
    subject: &Subject,
    kind: ImageKind,
    form: UploadForm,
) -> Result<Vec<Image>, ImageError> {
    let field = upload_field(kind);
    if form.files.is_empty() {
        return Err(ImageError::validation(field, "no file provided"));
    }
    if kind == ImageKind::Cover && form.files.len() > 1 {
        return Err(ImageError::validation(field, "only one cover image can be uploaded"));
    }
    if let Some(file) = form.files.iter().find(|f| !is_allowed_mime(&f.content_type)) {
        return Err(ImageError::validation(
            field,
            format!("invalid file type for {}", file.original_name),
        ));
    }
    if let Some(trip_id) = form.trip_id {
        let trip = TripStore::find_by_id(pool, trip_id)
            .await?
            .ok_or(ImageError::TripNotFound(trip_id))?;
        ensure(Some(subject), ANY_ROLE, Ownership::OwnedBy(trip.user_id))?;
    }

    let now = Utc::now();
    let mut written = Vec::with_capacity(form.files.len());
    let mut records = Vec::with_capacity(form.files.len());
    for file in form.files {
        let file_name = generate_file_name(kind, &file.original_name, now);
        blobs.save(kind, &file_name, &file.bytes).await?;
        written.push(file_name.clone());
        records.push(NewImage {
            trip_id: form.trip_id,
            uploaded_by: subject.id,
            url: api.public_link(&format!("{}/{file_name}", kind.route())),
            file_name,
            original_name: file.original_name,
            file_size: file.bytes.len() as i64,
            mime_type: file.content_type,
            kind,
        });
    }

    match insert_images(pool, &records).await {
        Ok(images) => {
            info!("Stored {} {kind} upload(s)", images.len());
            Ok(images)
        }
        Err(err) => {
            for file_name in &written {
                if let Err(e) = blobs.remove(kind, file_name).await {
                    warn!("Could not clean up blob {file_name}: {e}");
                }
            }
            Err(err)
        }
    }
}

async fn insert_images(pool: &PgPool, records: &[NewImage]) -> Result<Vec<Image>, ImageError> {
    let mut tx = pool.begin().await?;
    let mut images = Vec::with_capacity(records.len());
    for record in records {
        images.push(ImageStore::create(&mut *tx, record).await?);
    }
    tx.commit().await?;
    Ok(images)
}

pub async fn list_my_images(pool: &PgPool, subject: &Subject) -> Result<Vec<Image>, ImageError> {
    Ok(ImageStore::list_by_uploader(pool, subject.id).await?)
}

pub async fn list_trip_images(pool: &PgPool, trip_id: i32) -> Result<Vec<Image>, ImageError> {
    if TripStore::find_by_id(pool, trip_id).await?.is_none() {
        return Err(ImageError::TripNotFound(trip_id));
    }
    Ok(ImageStore::list_for_trips(pool, &[trip_id]).await?)
}

/// Streams a stored blob, using the recorded mime type when there is one.
pub async fn serve_image(
    pool: &PgPool,
    blobs: &BlobStore,
    kind: ImageKind,
    file_name: &str,
) -> Result<Response<Body>, ImageError> {
    let file = blobs
        .open(kind, file_name)
        .await?
        .ok_or_else(|| ImageError::NotFound(file_name.to_owned()))?;
    let mime_type = ImageStore::find_by_file_name(pool, file_name)
        .await?
        .map_or_else(|| content_type_for(file_name), |image| image.mime_type);
    let content_type = HeaderValue::from_str(&mime_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    let body = Body::from_stream(FramedRead::new(file, BytesCodec::new()));
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
        .map_err(|e| Report::new(e).wrap_err("Failed to build response"))?)
}

/// Deletes an image row and its blob. Only the uploader may do this.
#[instrument(skip(pool, blobs, subject), fields(user_id = subject.id))]
pub async fn delete_image(
    pool: &PgPool,
    blobs: &BlobStore,
    subject: &Subject,
    image_id: i32,
) -> Result<Image, ImageError> {
    let image = ImageStore::find_by_id(pool, image_id)
        .await?
        .ok_or_else(|| ImageError::NotFound(image_id.to_string()))?;
    let Some(owner) = image.uploaded_by else {
        return Err(ImageError::Forbidden(ForbiddenReason::NotOwner));
    };
    ensure(Some(subject), ANY_ROLE, Ownership::OwnedBy(owner))?;

    ImageStore::delete(pool, image.id).await?;
    if !blobs.remove(image.kind, &image.file_name).await? {
        warn!("Blob {} was already gone", image.file_name);
    }
    info!("Deleted image {}", image.id);
    Ok(image)
}
