//! Period addressing: where a sector's photo for a period lives in storage.
//!
//! Paths have the form `<root>/<period>/<sector>.jpg`. The mapping is pure
//! and total; storage backends decide how to encode the path on the wire.

use crate::period::Period;
use crate::sector::Sector;

/// File extension of stored photos.
pub const IMAGE_EXTENSION: &str = ".jpg";

fn default_root() -> String {
    String::from("data")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: String,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl StorageLayout {
    /// Create a layout rooted at `root`. Leading/trailing slashes are dropped;
    /// an empty root falls back to `data`.
    #[must_use]
    pub fn new(root: impl AsRef<str>) -> Self {
        let trimmed = root.as_ref().trim().trim_matches('/');
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self {
                root: trimmed.to_string(),
            }
        }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Directory holding every sector photo for `period`.
    #[must_use]
    pub fn period_dir(&self, period: Period) -> String {
        format!("{}/{period}", self.root)
    }

    /// Storage path of the photo for (`sector`, `period`).
    #[must_use]
    pub fn path_for(&self, sector: &Sector, period: Period) -> String {
        format!("{}/{period}/{sector}{IMAGE_EXTENSION}", self.root)
    }

    /// Recover the sector from a listing entry name such as `Desk.jpg`.
    ///
    /// Returns `None` for entries that are not stored photos.
    #[must_use]
    pub fn parse_entry_name(name: &str) -> Option<Sector> {
        let stem = name.strip_suffix(IMAGE_EXTENSION)?;
        Sector::new(stem).ok()
    }
}
