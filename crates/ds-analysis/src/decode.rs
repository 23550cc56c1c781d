//! Decoding the model's loosely structured reply.

use ds_core::AnalysisResult;

use crate::error::AnalysisError;

/// Strip a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse the model's text into an [`AnalysisResult`].
///
/// # Errors
///
/// Returns [`AnalysisError::Malformed`] carrying the raw text when the reply
/// is not a JSON object with both string-array fields. A missing field is an
/// error, never an empty list.
pub fn decode_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_str(strip_fences(raw)).map_err(|e| {
        tracing::warn!(raw, error = %e, "malformed analysis response");
        AnalysisError::Malformed {
            raw: raw.to_string(),
            reason: e.to_string(),
        }
    })
}
