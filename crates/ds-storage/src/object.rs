//! `object_store` backend: local filesystem or in-memory.

use std::path::Path as FsPath;
use std::sync::Arc;

use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};

use crate::{Entry, ImageStore, StorageError};

/// Storage backed by any [`ObjectStore`].
///
/// Object stores have no real directories, so a directory "exists" only while
/// something is stored beneath it. Listing an empty prefix reports
/// [`StorageError::NotFound`], matching a repository without that folder.
#[derive(Debug, Clone)]
pub struct ObjectImageStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectImageStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// Volatile store, used by tests and dry runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Store rooted at a local directory, created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or canonicalized.
    pub fn local(dir: impl AsRef<FsPath>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let fs = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| StorageError::from_object_store(&dir.display().to_string(), e))?;
        Ok(Self::new(Arc::new(fs)))
    }
}

impl ImageStore for ObjectImageStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let location = Path::from(path);
        let result = self
            .inner
            .get(&location)
            .await
            .map_err(|e| StorageError::from_object_store(path, e))?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::from_object_store(path, e))?;
        Ok(bytes.to_vec())
    }

    async fn write(&self, path: &str, bytes: &[u8], message: &str) -> Result<(), StorageError> {
        let location = Path::from(path);
        self.inner
            .put(&location, PutPayload::from(bytes.to_vec()))
            .await
            .map_err(|e| StorageError::from_object_store(path, e))?;
        tracing::debug!(path, size = bytes.len(), message, "object store: stored");
        Ok(())
    }

    async fn list_children(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        let prefix = Path::from(path);
        let listing = self
            .inner
            .list_with_delimiter(Some(&prefix))
            .await
            .map_err(|e| StorageError::from_object_store(path, e))?;

        let dirs = listing
            .common_prefixes
            .iter()
            .filter_map(|p| p.filename().map(Entry::dir));
        let files = listing
            .objects
            .iter()
            .filter_map(|meta| meta.location.filename().map(Entry::file));
        let entries: Vec<Entry> = dirs.chain(files).collect();

        if entries.is_empty() {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(entries)
    }
}
