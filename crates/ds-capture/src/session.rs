//! Capture session: scoped ownership of the camera.
//!
//! ```text
//! Idle --start()--> Live --stop()--> Idle
//!   \                 |
//!    start() fails    capture() -> Option<StillImage>
//!        v
//!   Error(message) --start()--> Live
//! ```

use ds_core::StillImage;

use crate::device::{CaptureConstraints, CaptureDevice};
use crate::error::DeviceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Live,
    /// Acquisition failed. Stays here until `start()` is called again.
    Error(String),
}

/// Holds at most one open device handle.
///
/// The handle is released by [`stop`](Self::stop), by a subsequent
/// [`start`](Self::start), and when the session is dropped.
pub struct CaptureSession<D: CaptureDevice> {
    device: D,
    constraints: CaptureConstraints,
    handle: Option<D::Handle>,
    state: SessionState,
}

impl<D: CaptureDevice> std::fmt::Debug for CaptureSession<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

impl<D: CaptureDevice> CaptureSession<D> {
    pub const fn new(device: D) -> Self {
        Self {
            device,
            constraints: CaptureConstraints,
            handle: None,
            state: SessionState::Idle,
        }
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn is_live(&self) -> bool {
        matches!(self.state, SessionState::Live)
    }

    /// The user-facing message of a failed acquisition.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Acquire the device, releasing any handle this session already holds.
    ///
    /// # Errors
    ///
    /// Returns the acquisition failure; the session is left in
    /// [`SessionState::Error`] with the error's message.
    pub async fn start(&mut self) -> Result<(), DeviceError> {
        self.stop();
        match self.device.open(&self.constraints).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = SessionState::Live;
                tracing::debug!("capture session live");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera acquisition failed");
                self.state = SessionState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Release the device. Calling it on an idle session does nothing.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.close(handle);
            tracing::debug!("capture session stopped");
        }
        if self.state == SessionState::Live {
            self.state = SessionState::Idle;
        }
    }

    /// Grab the current frame as a JPEG still.
    ///
    /// `None` means "try again": the session is not live, the device has not
    /// produced a frame yet, or the frame could not be encoded.
    pub async fn capture(&self) -> Option<StillImage> {
        let handle = match (&self.state, &self.handle) {
            (SessionState::Live, Some(handle)) => handle,
            _ => return None,
        };

        let frame = self.device.read_frame(handle).await?;
        if frame.is_empty() {
            tracing::debug!("device returned an empty frame");
            return None;
        }

        match frame.encode_jpeg() {
            Ok(still) => {
                tracing::debug!(width = still.width(), height = still.height(), "frame captured");
                Some(still)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode frame");
                None
            }
        }
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
