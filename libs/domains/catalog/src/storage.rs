//! Product image storage.
//!
//! Images are addressed by a generated file name that is stored on the
//! product row. Names handed back by clients are checked to be a single
//! plain path component before they touch the filesystem.

use async_trait::async_trait;
use axum::body::Bytes;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::ImageUpload;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid image name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persist the upload and return the name it is stored under
    async fn store(&self, upload: ImageUpload) -> StorageResult<String>;

    /// `None` when nothing is stored under `name`
    async fn load(&self, name: &str) -> StorageResult<Option<Bytes>>;

    /// Deleting a missing image is not an error
    async fn delete(&self, name: &str) -> StorageResult<()>;
}

/// Builds a fresh storage name, keeping a short alphanumeric extension
/// from the uploaded file name.
pub fn generate_image_name(original: Option<&str>) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();

    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id,
    }
}

/// Only a single normal path component is accepted.
pub fn validate_image_name(name: &str) -> StorageResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// Content type served for a stored image, by extension
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Images as files in one directory
#[derive(Debug, Clone)]
pub struct FsImageStorage {
    root: PathBuf,
}

impl FsImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directory if needed
    pub async fn init(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tracing::info!(dir = %self.root.display(), "Image storage ready");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_image_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ImageStorage for FsImageStorage {
    async fn store(&self, upload: ImageUpload) -> StorageResult<String> {
        let name = generate_image_name(upload.file_name.as_deref());
        let path = self.path_for(&name)?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!(image = %name, bytes = upload.bytes.len(), "Stored image");
        Ok(name)
    }

    async fn load(&self, name: &str) -> StorageResult<Option<Bytes>> {
        let path = self.path_for(name)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.path_for(name)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(image = %name, "Deleted image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryImageStorage {
    images: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.images.read().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn store(&self, upload: ImageUpload) -> StorageResult<String> {
        let name = generate_image_name(upload.file_name.as_deref());
        self.images.write().await.insert(name.clone(), upload.bytes);
        Ok(name)
    }

    async fn load(&self, name: &str) -> StorageResult<Option<Bytes>> {
        validate_image_name(name)?;
        Ok(self.images.read().await.get(name).cloned())
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        validate_image_name(name)?;
        self.images.write().await.remove(name);
        Ok(())
    }
}
