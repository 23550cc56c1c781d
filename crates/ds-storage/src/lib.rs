//! # ds-storage
//!
//! Persistent storage of sector photos keyed by (sector, period).
//!
//! Any backend implementing [`ImageStore`] can hold the photos:
//! - [`GitHubStore`] commits them to a GitHub repository via the contents API
//! - [`ObjectImageStore`] keeps them in an `object_store` backend (local
//!   filesystem or in-memory)
//!
//! On top of a store, [`BaselineResolver`] fetches the photo to compare against
//! and [`Catalog`] lists which periods and sectors have photos.

pub mod backend;
pub mod catalog;
pub mod error;
pub mod github;
pub mod http;
pub mod object;
pub mod resolver;

use std::future::Future;
use std::sync::Arc;

use ds_core::{EntryKind, Period, Sector};

pub use backend::ConfiguredStore;
pub use catalog::Catalog;
pub use error::StorageError;
pub use github::GitHubStore;
pub use object::ObjectImageStore;
pub use resolver::{Baseline, BaselineResolver};

/// One child of a storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// A keyed byte store addressed by slash-separated paths.
///
/// Reads of absent paths fail with [`StorageError::NotFound`] so callers can
/// tell "no photo yet" apart from transport failures.
pub trait ImageStore {
    /// Fetch the bytes stored at `path`.
    fn read(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Create or replace the bytes at `path`. `message` describes the change
    /// for backends that keep history.
    fn write(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// List the immediate children of the directory at `path`.
    fn list_children(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<Entry>, StorageError>> + Send;
}

impl<T: ImageStore> ImageStore for &T {
    fn read(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send {
        T::read(self, path)
    }

    fn write(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        T::write(self, path, bytes, message)
    }

    fn list_children(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<Entry>, StorageError>> + Send {
        T::list_children(self, path)
    }
}

impl<T: ImageStore> ImageStore for Arc<T> {
    fn read(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send {
        T::read(self, path)
    }

    fn write(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        T::write(self, path, bytes, message)
    }

    fn list_children(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<Entry>, StorageError>> + Send {
        T::list_children(self, path)
    }
}

/// Commit message recorded when a sector photo is stored.
#[must_use]
pub fn commit_message(sector: &Sector, period: Period) -> String {
    format!("Update {sector} for {period}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_message_names_sector_and_period() {
        let sector = Sector::new("North Wall").unwrap();
        let period: Period = "2025-01".parse().unwrap();
        assert_eq!(commit_message(&sector, period), "Update North Wall for 2025-01");
    }
}
