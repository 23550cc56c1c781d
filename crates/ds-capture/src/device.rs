//! The device-acquisition seam.

use std::future::Future;

use crate::error::DeviceError;
use crate::frame::Frame;

/// Requested properties of the video stream: the back camera, pointed at the
/// room, with video only. Audio is never opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureConstraints;

/// A camera (or anything that can stand in for one).
///
/// `open` and `close` must be paired: every handle returned by `open` is
/// passed to `close` exactly once.
pub trait CaptureDevice {
    type Handle: Send + Sync;

    fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = Result<Self::Handle, DeviceError>> + Send;

    fn close(&self, handle: Self::Handle);

    /// The current frame, or `None` if the device has not produced one yet.
    fn read_frame(&self, handle: &Self::Handle) -> impl Future<Output = Option<Frame>> + Send;
}
