//! Storage error types.

use ds_core::FailureKind;
use thiserror::Error;

/// Errors that can occur when reading or writing stored photos.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing is stored at the path. Expected when no baseline exists yet.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// A backend was used without the credentials it needs.
    #[error("storage is not configured: missing {0}")]
    MissingCredential(&'static str),

    /// The backend rejected the credentials.
    #[error("storage rejected credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The backend API returned a non-success status code.
    #[error("storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error.
    #[error("storage HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Object store backend error other than not-found.
    #[error("object store error: {0}")]
    ObjectStore(object_store::Error),

    /// Local filesystem error while preparing a backend.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The path names a directory (or something else that is not a file).
    #[error("not a file: {path}")]
    NotAFile { path: String },

    /// The backend returned content that could not be decoded.
    #[error("failed to decode stored content: {0}")]
    Decode(String),
}

impl StorageError {
    /// Classify this error in the shared failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::StorageNotFound,
            Self::MissingCredential(_) => FailureKind::MissingCredential,
            _ => FailureKind::StorageTransport,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn from_object_store(path: &str, error: object_store::Error) -> Self {
        match error {
            object_store::Error::NotFound { .. } => Self::NotFound {
                path: path.to_string(),
            },
            other => Self::ObjectStore(other),
        }
    }
}
