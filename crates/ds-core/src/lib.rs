//! # ds-core
//!
//! Core types, period addressing, and error types for diffshame.
//!
//! This crate provides the foundational types shared across all diffshame crates:
//! - `Sector` and `Period` identities for stored photos
//! - Period addressing (`StorageLayout`) mapping a sector/period pair to a storage path
//! - Image payload types (`StillImage`, `StoredImage`)
//! - The structured `AnalysisResult` returned by the vision service
//! - Flow state enum with its transition table
//! - Cross-cutting error types and the failure taxonomy every crate maps into

pub mod analysis;
pub mod enums;
pub mod errors;
pub mod image;
pub mod layout;
pub mod period;
pub mod sector;

pub use analysis::AnalysisResult;
pub use enums::{EntryKind, FailureKind, FlowState};
pub use errors::CoreError;
pub use image::{JPEG_MIME_TYPE, StillImage, StoredImage};
pub use layout::StorageLayout;
pub use period::{Period, period_of};
pub use sector::Sector;
