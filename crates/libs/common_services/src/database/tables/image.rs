use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

/// Metadata of an uploaded image. The bytes live in the blob store under `file_name`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Image {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub trip_id: Option<i32>,
    pub uploaded_by: Option<i32>,
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub kind: ImageKind,
}

/// Which blob folder an image is stored in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "image_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Image,
    Cover,
}

impl ImageKind {
    /// Prefix of generated file names.
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Cover => "cover",
        }
    }

    /// Public route the blob is served from.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Image => "/images",
            Self::Cover => "/covers",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// Values needed to insert an image row.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub trip_id: Option<i32>,
    pub uploaded_by: i32,
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub kind: ImageKind,
}
