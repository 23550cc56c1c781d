//! The vision-model seam.

use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ds_core::JPEG_MIME_TYPE;

use crate::error::AnalysisError;

/// An image in transport form: base64 (standard alphabet) plus mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub data: String,
}

impl EncodedImage {
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            mime_type: JPEG_MIME_TYPE,
            data: STANDARD.encode(bytes),
        }
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A model that answers a prompt about two images with free text.
///
/// Implementations must not retry: a failed call is surfaced to the user, who
/// decides whether to try again.
pub trait VisionModel {
    fn submit(
        &self,
        api_key: &str,
        prompt: &str,
        first: &EncodedImage,
        second: &EncodedImage,
    ) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_is_standard_base64() {
        let image = EncodedImage::jpeg(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "/9j/");
    }
}
