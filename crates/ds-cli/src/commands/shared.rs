use std::time::Duration;

use anyhow::Context;
use ds_analysis::{AnalysisPipeline, GeminiClient};
use ds_config::DsConfig;
use ds_core::{AnalysisResult, Period};
use ds_flow::FlowError;
use ds_storage::Baseline;
use serde::Serialize;

/// Build the Gemini-backed pipeline, with `--timeout` taking precedence over
/// `gemini.timeout_secs`.
pub fn analysis_pipeline(
    config: &DsConfig,
    timeout_secs: Option<u64>,
) -> anyhow::Result<AnalysisPipeline<GeminiClient>> {
    let client = GeminiClient::new(&config.gemini).context("failed to build Gemini client")?;
    let deadline = timeout_secs.map_or_else(|| config.gemini.timeout(), Duration::from_secs);
    Ok(AnalysisPipeline::new(
        client,
        config.gemini.api_key.clone(),
        deadline,
    ))
}

/// A stored photo as reported to the user.
#[derive(Debug, Serialize)]
pub struct PhotoStatus {
    pub period: Period,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

impl From<&Baseline> for PhotoStatus {
    fn from(baseline: &Baseline) -> Self {
        Self {
            period: baseline.period(),
            found: baseline.is_available(),
            bytes: baseline.image().map(|image| image.bytes.len()),
        }
    }
}

/// How the analysis step of a command ended. Flattened into the report, so
/// an empty summary adds no fields.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    /// Nothing stagnant and nothing new.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    /// Running the same command again may succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_skipped: Option<String>,
}

impl AnalysisSummary {
    pub fn completed(result: &AnalysisResult) -> Self {
        Self {
            analysis: Some(result.clone()),
            clean: Some(result.is_clean()),
            ..Self::default()
        }
    }

    pub fn failed(error: &FlowError) -> Self {
        Self {
            analysis_error: Some(error.to_string()),
            retryable: Some(error.kind().is_retryable()),
            ..Self::default()
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            analysis_skipped: Some(reason.into()),
            ..Self::default()
        }
    }

    /// The failure message, if the analysis was attempted and failed.
    pub fn failure(&self) -> Option<&str> {
        self.analysis_error.as_deref()
    }
}
