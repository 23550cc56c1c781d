//! Flow error types.

use ds_analysis::AnalysisError;
use ds_capture::DeviceError;
use ds_core::{CoreError, FailureKind, FlowState, Period, Sector};
use ds_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// The action is not offered in the current state.
    #[error("cannot {action} while {state}")]
    InvalidAction {
        action: &'static str,
        state: FlowState,
    },

    /// An abandoned analysis has not finished running yet.
    #[error("an earlier analysis is still running")]
    AnalysisInFlight,

    #[error("no sector selected")]
    NoSelection,

    #[error("no photo captured")]
    NoStill,

    /// Capturing is gated on a baseline and none is stored.
    #[error("no {sector} photo stored for {period} to compare against")]
    BaselineRequired { sector: Sector, period: Period },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl FlowError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidAction { .. }
            | Self::NoSelection
            | Self::NoStill
            | Self::AnalysisInFlight
            | Self::BaselineRequired { .. } => FailureKind::InvalidAction,
            Self::Device(e) => e.kind(),
            Self::Storage(e) => e.kind(),
            Self::Analysis(e) => e.kind(),
            Self::Core(e) => e.kind(),
        }
    }
}

/// The last failure, kept for display after the flow has recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNotice {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&FlowError> for FlowNotice {
    fn from(error: &FlowError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
