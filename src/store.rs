use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;

use crate::error::CaptionError;
use crate::image::ImageUpload;

pub const DEFAULT_UPLOAD_DIR: &str = "uploaded_images";

/// Keeps a copy of every upload, keyed by its original file name.
///
/// A later upload with the same name overwrites the earlier one.
#[derive(Clone)]
pub struct UploadStore {
    store: Arc<dyn ObjectStore>,
}

impl UploadStore {
    /// Store uploads under `dir`, creating it if needed.
    pub fn local(dir: impl AsRef<std::path::Path>) -> Result<Self, CaptionError> {
        std::fs::create_dir_all(dir.as_ref())?;
        let store = LocalFileSystem::new_with_prefix(dir.as_ref())?;
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemory::new()))
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, upload: &ImageUpload) -> Result<Path, CaptionError> {
        let path = Path::from(upload.file_name.as_str());
        self.store
            .put(&path, PutPayload::from(upload.data.clone()))
            .await?;
        tracing::info!("File uploaded: {}", upload.file_name);
        Ok(path)
    }

    pub async fn load(&self, file_name: &str) -> Result<Bytes, CaptionError> {
        let path = Path::from(file_name);
        let result = self.store.get(&path).await?;
        Ok(result.bytes().await?)
    }
}
