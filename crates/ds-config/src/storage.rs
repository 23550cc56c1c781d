//! Storage backend selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which storage collaborator holds the photos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// A GitHub repository, via the contents API.
    #[default]
    Github,
    /// A directory on the local filesystem.
    Local,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Github => "github",
            Self::Local => "local",
        })
    }
}

fn default_local_path() -> String {
    String::from(".diffshame/photos")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory used by the `local` backend.
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_path: default_local_path(),
        }
    }
}
