//! Flat-folder blob storage for uploaded images, keyed by generated file name.

use crate::database::image::ImageKind;
use app_state::UploadSettings;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, File};
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    image_folder: PathBuf,
    cover_folder: PathBuf,
}

impl BlobStore {
    #[must_use]
    pub fn new(image_folder: PathBuf, cover_folder: PathBuf) -> Self {
        Self {
            image_folder,
            cover_folder,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.image_folder.clone(), settings.cover_folder.clone())
    }

    #[must_use]
    pub fn folder(&self, kind: ImageKind) -> &Path {
        match kind {
            ImageKind::Image => &self.image_folder,
            ImageKind::Cover => &self.cover_folder,
        }
    }

    /// Resolves a file name inside the folder of `kind`. Only plain names are accepted.
    pub fn path_for(&self, kind: ImageKind, file_name: &str) -> Result<PathBuf, StorageError> {
        let is_plain = !file_name.is_empty()
            && file_name != "."
            && !file_name.contains("..")
            && !file_name.contains(['/', '\\', '\0']);
        if !is_plain {
            return Err(StorageError::InvalidFileName(file_name.to_owned()));
        }
        Ok(self.folder(kind).join(file_name))
    }

    pub async fn save(
        &self,
        kind: ImageKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(kind, file_name)?;
        fs::create_dir_all(self.folder(kind)).await?;
        fs::write(&path, bytes).await?;
        debug!("Stored blob {}", path.display());
        Ok(path)
    }

    /// Opens a stored blob, `None` when it does not exist.
    pub async fn open(&self, kind: ImageKind, file_name: &str) -> Result<Option<File>, StorageError> {
        let path = self.path_for(kind, file_name)?;
        match File::open(&path).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a blob. Returns `false` when there was nothing to remove.
    pub async fn remove(&self, kind: ImageKind, file_name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(kind, file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
