//! Image payloads moving through the pipeline.

use std::fmt;

use crate::period::Period;
use crate::sector::Sector;

/// Mime type of every still and stored image.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// A JPEG still produced by a capture session and not yet stored.
#[derive(Clone, PartialEq, Eq)]
pub struct StillImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl StillImage {
    #[must_use]
    pub const fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for StillImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StillImage")
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A JPEG payload stored for (`sector`, `period`). At most one exists per key.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub sector: Sector,
    pub period: Period,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for StoredImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredImage")
            .field("sector", &self.sector)
            .field("period", &self.period)
            .field("len", &self.bytes.len())
            .finish()
    }
}
