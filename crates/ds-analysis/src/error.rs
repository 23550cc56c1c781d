//! Analysis error types.

use std::fmt;
use std::time::Duration;

use ds_core::FailureKind;
use thiserror::Error;

/// Which side of a comparison an image is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Baseline,
    Capture,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "baseline",
            Self::Capture => "capture",
        })
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Analysis was requested without an API key. Raised before any request.
    #[error("analysis is not configured: missing {0}")]
    MissingCredential(&'static str),

    /// One of the two images is absent or empty.
    #[error("cannot analyze without a {0} image")]
    MissingImage(ImageRole),

    /// The model did not answer before the deadline.
    #[error("analysis timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The model answered with something that is not the expected JSON.
    #[error("analysis response could not be decoded: {reason}")]
    Malformed { raw: String, reason: String },

    #[error("analysis HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl AnalysisError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCredential(_) => FailureKind::MissingCredential,
            Self::MissingImage(_) => FailureKind::InvalidAction,
            Self::Timeout(_) => FailureKind::AnalysisTimeout,
            Self::Malformed { .. } => FailureKind::AnalysisMalformed,
            Self::Http(_) | Self::Api { .. } => FailureKind::AnalysisTransport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            AnalysisError::Timeout(Duration::from_secs(60)).kind(),
            FailureKind::AnalysisTimeout
        );
        assert_eq!(
            AnalysisError::MissingCredential("gemini.api_key").kind(),
            FailureKind::MissingCredential
        );
        assert_eq!(
            AnalysisError::Api {
                status: 500,
                message: String::new()
            }
            .kind(),
            FailureKind::AnalysisTransport
        );
    }

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            AnalysisError::MissingImage(ImageRole::Baseline).to_string(),
            "cannot analyze without a baseline image"
        );
        assert_eq!(
            AnalysisError::Timeout(Duration::from_secs(60)).to_string(),
            "analysis timed out after 60s"
        );
    }
}
