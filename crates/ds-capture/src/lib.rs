//! # ds-capture
//!
//! Owns the camera for the duration of a capture and turns a live frame into
//! a JPEG still.
//!
//! The physical device sits behind [`CaptureDevice`]. A [`CaptureSession`]
//! holds at most one open handle, releases it on `stop()` and on drop, and
//! never reports "no frame yet" as an error.

pub mod device;
pub mod error;
pub mod file_device;
pub mod frame;
pub mod session;

pub use device::{CaptureConstraints, CaptureDevice};
pub use error::DeviceError;
pub use file_device::ImageFileDevice;
pub use frame::{Frame, JPEG_QUALITY};
pub use session::{CaptureSession, SessionState};
