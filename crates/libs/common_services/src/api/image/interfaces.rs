use crate::database::image::ImageKind;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

/// Content types accepted for uploads.
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// A single file taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// The parsed multipart form of an upload request.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub trip_id: Option<i32>,
}

#[must_use]
pub fn is_allowed_mime(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_MIME_TYPES.contains(&essence.as_str())
}

/// Content type derived from a file name's extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}

/// Builds `<prefix>_<YYYYmmdd_HHMMSS>_<uuid><.ext>`, keeping an alphanumeric extension
/// of the original name.
#[must_use]
pub fn generate_file_name(kind: ImageKind, original_name: &str, now: DateTime<Utc>) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!(
        "{}_{}_{}{}",
        kind.file_prefix(),
        now.format("%Y%m%d_%H%M%S"),
        Uuid::new_v4(),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn only_image_types_are_allowed() {
        assert!(is_allowed_mime("image/png"));
        assert!(is_allowed_mime("IMAGE/JPEG"));
        assert!(is_allowed_mime("image/webp; charset=binary"));
        assert!(!is_allowed_mime("image/svg+xml"));
        assert!(!is_allowed_mime("application/pdf"));
    }

    #[test]
    fn content_type_falls_back_to_octet_stream() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn generated_name_has_prefix_timestamp_and_extension() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).single().expect("valid date");
        let name = generate_file_name(ImageKind::Cover, "beach photo.JPG", now);
        assert!(name.starts_with("cover_20250309_140507_"), "{name}");
        assert!(name.ends_with(".JPG"), "{name}");
        // prefix + timestamp + uuid + extension
        assert_eq!(name.len(), "cover_".len() + 15 + 1 + 36 + 4);
    }

    #[test]
    fn odd_extensions_are_dropped() {
        let now = Utc::now();
        let name = generate_file_name(ImageKind::Image, "archive.tar/../x", now);
        assert!(!name.contains('/'));
        let name = generate_file_name(ImageKind::Image, "no_extension", now);
        assert_eq!(name.matches('.').count(), 0);
    }
}
