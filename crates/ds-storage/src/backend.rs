//! Choosing a backend from configuration.

use std::path::Path;

use ds_config::{DsConfig, StorageBackend};

use crate::{Entry, GitHubStore, ImageStore, ObjectImageStore, StorageError};

/// The store selected by `storage.backend`.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    GitHub(GitHubStore),
    Object(ObjectImageStore),
}

impl ConfiguredStore {
    /// Build the configured backend. A relative `storage.local_path` is
    /// resolved against `project_root`.
    ///
    /// # Errors
    ///
    /// [`StorageError::MissingCredential`] for an unconfigured GitHub backend,
    /// or an IO error if the local directory cannot be created.
    pub fn from_config(config: &DsConfig, project_root: &Path) -> Result<Self, StorageError> {
        match config.storage.backend {
            StorageBackend::Github => Ok(Self::GitHub(GitHubStore::new(&config.github)?)),
            StorageBackend::Local => {
                let dir = project_root.join(&config.storage.local_path);
                Ok(Self::Object(ObjectImageStore::local(dir)?))
            }
        }
    }

    #[must_use]
    pub const fn backend(&self) -> StorageBackend {
        match self {
            Self::GitHub(_) => StorageBackend::Github,
            Self::Object(_) => StorageBackend::Local,
        }
    }
}

impl ImageStore for ConfiguredStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::GitHub(store) => store.read(path).await,
            Self::Object(store) => store.read(path).await,
        }
    }

    async fn write(&self, path: &str, bytes: &[u8], message: &str) -> Result<(), StorageError> {
        match self {
            Self::GitHub(store) => store.write(path, bytes, message).await,
            Self::Object(store) => store.write(path, bytes, message).await,
        }
    }

    async fn list_children(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        match self {
            Self::GitHub(store) => store.list_children(path).await,
            Self::Object(store) => store.list_children(path).await,
        }
    }
}
