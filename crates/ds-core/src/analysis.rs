//! Structured critique returned by the vision service.

use serde::{Deserialize, Serialize};

/// What changed between a baseline photo and a new capture.
///
/// Both fields are required when decoding: a response missing either list is
/// malformed, not empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Items judged unchanged in position since the baseline.
    pub stagnant_items: Vec<String>,
    /// Newly introduced clutter or mess.
    pub trash_items: Vec<String>,
}

impl AnalysisResult {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stagnant_items.is_empty() && self.trash_items.is_empty()
    }
}
