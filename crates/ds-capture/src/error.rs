use ds_core::FailureKind;
use thiserror::Error;

/// Errors from acquiring the capture device.
///
/// The `Display` text of the first two variants is stable and shown to the user.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Could not access camera. Please ensure you have granted permissions.")]
    PermissionDenied,

    #[error("No camera device is available.")]
    NotFound,

    #[error("camera IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeviceError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        FailureKind::DeviceUnavailable
    }

    /// Classify an IO error raised while opening a device.
    pub(crate) fn from_open(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(error),
        }
    }
}
