//! Raw video frames and their JPEG encoding.

use std::fmt;

use ds_core::StillImage;
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::error::{ParameterError, ParameterErrorKind};

/// JPEG quality used for every still.
pub const JPEG_QUALITY: u8 = 80;

/// One decoded video frame, RGBA8 row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Frame {
    pub const fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    /// A frame with no pixels, as reported before the stream warms up.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.data.len() / 4 * 3);
        for chunk in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
        }
        rgb
    }

    /// Encode as a JPEG still at [`JPEG_QUALITY`].
    ///
    /// # Errors
    ///
    /// Fails if the frame is empty or the pixel buffer does not match the
    /// dimensions.
    pub fn encode_jpeg(&self) -> Result<StillImage, image::ImageError> {
        let expected = u64::from(self.width) * u64::from(self.height) * 4;
        if self.is_empty() || u64::try_from(self.data.len()).ok() != Some(expected) {
            return Err(image::ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )));
        }

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).write_image(
            &self.to_rgb(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(StillImage::new(bytes, self.width, self.height))
    }
}
