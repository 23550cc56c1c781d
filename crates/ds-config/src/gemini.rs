//! Gemini vision analysis configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::github::redact;

fn default_model() -> String {
    String::from("gemini-1.5-flash-001")
}

fn default_api_url() -> String {
    String::from("https://generativelanguage.googleapis.com/v1beta")
}

/// Default analysis deadline in seconds.
const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// Google AI Studio API key.
    #[serde(default)]
    pub api_key: String,

    /// Model name used for `generateContent`.
    #[serde(default = "default_model")]
    pub model: String,

    /// REST API base URL (without the `/models/...` suffix).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Deadline for one analysis call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.model.is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
