//! A camera stand-in that serves a photo from disk.
//!
//! Lets the capture flow run from the command line: the "live frame" is
//! whatever image file the path points at when the frame is read.

use std::path::{Path, PathBuf};

use crate::device::{CaptureConstraints, CaptureDevice};
use crate::error::DeviceError;
use crate::frame::Frame;

#[derive(Debug, Clone)]
pub struct ImageFileDevice {
    path: PathBuf,
}

#[derive(Debug)]
pub struct ImageFileHandle {
    path: PathBuf,
}

impl ImageFileDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureDevice for ImageFileDevice {
    type Handle = ImageFileHandle;

    async fn open(&self, _constraints: &CaptureConstraints) -> Result<ImageFileHandle, DeviceError> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(DeviceError::from_open)?;
        if !meta.is_file() {
            return Err(DeviceError::NotFound);
        }
        tracing::debug!(path = %self.path.display(), "file device opened");
        Ok(ImageFileHandle {
            path: self.path.clone(),
        })
    }

    fn close(&self, handle: ImageFileHandle) {
        tracing::debug!(path = %handle.path.display(), "file device closed");
    }

    async fn read_frame(&self, handle: &ImageFileHandle) -> Option<Frame> {
        let bytes = match tokio::fs::read(&handle.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %handle.path.display(), error = %e, "failed to read frame source");
                return None;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(image) => Some(Frame::from_image(&image)),
            Err(e) => {
                tracing::warn!(path = %handle.path.display(), error = %e, "frame source is not an image");
                None
            }
        }
    }
}
