//! Flow states, storage entry kinds, and the failure taxonomy.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! [`FlowState`] provides `allowed_next_states()` so the flow can reject
//! transitions that are not part of the capture state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FlowState
// ---------------------------------------------------------------------------

/// State of a capture flow.
///
/// ```text
/// selecting → capturing → previewing → analyzing → result → confirmed
///                 ↑            │  ↑          │
///                 └─ retake ───┘  └─ failure ┘
///                              previewing → confirmed
/// ```
///
/// Every state can also go back to `selecting` (user navigates away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Selecting,
    Capturing,
    Previewing,
    Analyzing,
    Result,
    Confirmed,
}

impl FlowState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Selecting => &[Self::Capturing],
            Self::Capturing => &[Self::Previewing, Self::Selecting],
            Self::Previewing => &[
                Self::Capturing,
                Self::Analyzing,
                Self::Confirmed,
                Self::Selecting,
            ],
            Self::Analyzing => &[Self::Result, Self::Previewing, Self::Selecting],
            Self::Result => &[Self::Confirmed, Self::Capturing, Self::Selecting],
            Self::Confirmed => &[Self::Selecting],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selecting => "selecting",
            Self::Capturing => "capturing",
            Self::Previewing => "previewing",
            Self::Analyzing => "analyzing",
            Self::Result => "result",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntryKind
// ---------------------------------------------------------------------------

/// Kind of a child entry returned by a storage listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Shared failure taxonomy. Every crate error reports one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Camera permission denied or no hardware. Terminal until retried.
    DeviceUnavailable,
    /// Nothing stored at the requested path. Expected, never fatal.
    StorageNotFound,
    /// Storage backend failed (network, auth, API error).
    StorageTransport,
    /// The analysis call did not settle before its deadline.
    AnalysisTimeout,
    /// The analysis response could not be decoded.
    AnalysisMalformed,
    /// The analysis service itself failed (network, API error).
    AnalysisTransport,
    /// A storage or analysis call was attempted without configuration.
    MissingCredential,
    /// The requested action is not available in the current state.
    InvalidAction,
    /// A user-supplied value was rejected.
    InvalidInput,
}

impl FailureKind {
    /// Whether the user can retry the same action without changing anything.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::DeviceUnavailable
                | Self::StorageTransport
                | Self::AnalysisTimeout
                | Self::AnalysisMalformed
                | Self::AnalysisTransport
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeviceUnavailable => "device_unavailable",
            Self::StorageNotFound => "storage_not_found",
            Self::StorageTransport => "storage_transport",
            Self::AnalysisTimeout => "analysis_timeout",
            Self::AnalysisMalformed => "analysis_malformed",
            Self::AnalysisTransport => "analysis_transport",
            Self::MissingCredential => "missing_credential",
            Self::InvalidAction => "invalid_action",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
