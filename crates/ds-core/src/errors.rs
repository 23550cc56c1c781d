//! Cross-cutting error types for diffshame.
//!
//! Domain-specific errors (e.g., `StorageError`, `AnalysisError`) are defined in
//! their respective crates. Each of them reports a [`FailureKind`] so the flow
//! and the CLI can treat failures uniformly.

use thiserror::Error;

use crate::enums::FailureKind;

/// Errors that can be raised when constructing core values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A sector name cannot be used as a storage path segment.
    #[error("Invalid sector name '{name}': {reason}")]
    InvalidSector { name: String, reason: &'static str },

    /// A period string is not in canonical `YYYY-MM` form.
    #[error("Invalid period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),

    /// A period would fall outside the four-digit year range.
    #[error("Period out of range: {year}-{month}")]
    PeriodOutOfRange { year: i64, month: i64 },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl CoreError {
    /// Classify this error in the shared failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidTransition { .. } => FailureKind::InvalidAction,
            Self::InvalidSector { .. } | Self::InvalidPeriod(_) | Self::PeriodOutOfRange { .. } => {
                FailureKind::InvalidInput
            }
        }
    }
}
