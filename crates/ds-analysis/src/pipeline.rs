//! The analysis pipeline: credentials, encoding, deadline, decoding.

use std::time::Duration;

use ds_config::GeminiConfig;
use ds_core::AnalysisResult;

use crate::decode::decode_response;
use crate::error::{AnalysisError, ImageRole};
use crate::model::{EncodedImage, VisionModel};
use crate::prompt::COMPARISON_PROMPT;

/// Both images of a comparison. Construction fails if either is missing, so a
/// pair in hand is always analyzable.
#[derive(Clone, PartialEq, Eq)]
pub struct ComparisonPair {
    baseline: Vec<u8>,
    capture: Vec<u8>,
}

impl std::fmt::Debug for ComparisonPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonPair")
            .field("baseline_len", &self.baseline.len())
            .field("capture_len", &self.capture.len())
            .finish()
    }
}

impl ComparisonPair {
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingImage`] if either payload is empty.
    pub fn new(baseline: Vec<u8>, capture: Vec<u8>) -> Result<Self, AnalysisError> {
        Self::from_parts(Some(baseline), Some(capture))
    }

    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingImage`] naming the first absent side.
    pub fn from_parts(
        baseline: Option<Vec<u8>>,
        capture: Option<Vec<u8>>,
    ) -> Result<Self, AnalysisError> {
        let baseline = baseline
            .filter(|b| !b.is_empty())
            .ok_or(AnalysisError::MissingImage(ImageRole::Baseline))?;
        let capture = capture
            .filter(|c| !c.is_empty())
            .ok_or(AnalysisError::MissingImage(ImageRole::Capture))?;
        Ok(Self { baseline, capture })
    }

    pub fn baseline(&self) -> &[u8] {
        &self.baseline
    }

    pub fn capture(&self) -> &[u8] {
        &self.capture
    }
}

/// Runs one comparison against a [`VisionModel`] under a deadline.
///
/// The baseline is always sent first and the capture second.
#[derive(Debug)]
pub struct AnalysisPipeline<M> {
    model: M,
    api_key: String,
    deadline: Duration,
}

impl<M: VisionModel> AnalysisPipeline<M> {
    pub fn new(model: M, api_key: impl Into<String>, deadline: Duration) -> Self {
        Self {
            model,
            api_key: api_key.into(),
            deadline,
        }
    }

    pub fn from_config(model: M, config: &GeminiConfig) -> Self {
        Self::new(model, config.api_key.clone(), config.timeout())
    }

    pub const fn deadline(&self) -> Duration {
        self.deadline
    }

    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Fail fast when analysis cannot possibly be attempted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingCredential`] if no API key is set.
    pub fn check_ready(&self) -> Result<(), AnalysisError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::MissingCredential("gemini.api_key"));
        }
        Ok(())
    }

    /// Compare the pair and decode the verdict.
    ///
    /// If the model has not answered when the deadline passes, the call is
    /// dropped and [`AnalysisError::Timeout`] returned; its eventual answer is
    /// never observed.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingCredential`] before any request, `Timeout` on
    /// deadline expiry, `Malformed` if the reply does not decode, and the
    /// model's own transport errors.
    pub async fn analyze(&self, pair: &ComparisonPair) -> Result<AnalysisResult, AnalysisError> {
        self.check_ready()?;

        let before = EncodedImage::jpeg(pair.baseline());
        let after = EncodedImage::jpeg(pair.capture());
        let call = self
            .model
            .submit(&self.api_key, COMPARISON_PROMPT, &before, &after);

        let raw = tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| {
                tracing::warn!(deadline_ms = self.deadline.as_millis(), "analysis timed out");
                AnalysisError::Timeout(self.deadline)
            })??;

        let result = decode_response(&raw)?;
        tracing::info!(
            stagnant = result.stagnant_items.len(),
            trash = result.trash_items.len(),
            "analysis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use pretty_assertions::assert_eq;

    struct ScriptedModel {
        reply: Result<String, u16>,
        delay: Duration,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl VisionModel for ScriptedModel {
        async fn submit(
            &self,
            _api_key: &str,
            _prompt: &str,
            first: &EncodedImage,
            second: &EncodedImage,
        ) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((first.data.clone(), second.data.clone()));
            tokio::time::sleep(self.delay).await;
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AnalysisError::Api {
                    status: *status,
                    message: "boom".into(),
                }),
            }
        }
    }

    fn pair() -> ComparisonPair {
        ComparisonPair::new(b"december".to_vec(), b"january".to_vec()).unwrap()
    }

    const MUG: &str = "```json\n{\"stagnantItems\":[\"mug\"],\"trashItems\":[]}\n```";

    #[tokio::test]
    async fn decodes_fenced_reply() {
        let pipeline = AnalysisPipeline::new(ScriptedModel::replying(MUG), "key", Duration::from_secs(5));
        let result = pipeline.analyze(&pair()).await.unwrap();
        assert_eq!(
            result,
            AnalysisResult {
                stagnant_items: vec!["mug".into()],
                trash_items: vec![],
            }
        );
    }

    #[tokio::test]
    async fn sends_baseline_first() {
        let pipeline = AnalysisPipeline::new(ScriptedModel::replying(MUG), "key", Duration::from_secs(5));
        pipeline.analyze(&pair()).await.unwrap();

        let seen = pipeline.model().seen.lock().unwrap();
        assert_eq!(seen[0].0, EncodedImage::jpeg(b"december").data);
        assert_eq!(seen[0].1, EncodedImage::jpeg(b"january").data);
    }

    #[tokio::test]
    async fn missing_key_fails_before_call() {
        let pipeline = AnalysisPipeline::new(ScriptedModel::replying(MUG), "  ", Duration::from_secs(5));
        let err = pipeline.analyze(&pair()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCredential("gemini.api_key")));
        assert_eq!(pipeline.model().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let model = ScriptedModel::replying(MUG).slow(Duration::from_secs(10));
        let pipeline = AnalysisPipeline::new(model, "key", Duration::from_millis(30));
        let err = pipeline.analyze(&pair()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout(d) if d == Duration::from_millis(30)));
        assert_eq!(err.kind(), ds_core::FailureKind::AnalysisTimeout);
    }

    #[tokio::test]
    async fn malformed_reply_keeps_raw_text() {
        let pipeline = AnalysisPipeline::new(
            ScriptedModel::replying("I cannot see any images."),
            "key",
            Duration::from_secs(5),
        );
        let err = pipeline.analyze(&pair()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed { ref raw, .. } if raw == "I cannot see any images."));
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let mut model = ScriptedModel::replying("");
        model.reply = Err(503);
        let pipeline = AnalysisPipeline::new(model, "key", Duration::from_secs(5));
        let err = pipeline.analyze(&pair()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Api { status: 503, .. }));
    }

    #[test]
    fn pair_rejects_missing_sides() {
        assert!(matches!(
            ComparisonPair::from_parts(None, Some(b"x".to_vec())),
            Err(AnalysisError::MissingImage(ImageRole::Baseline))
        ));
        assert!(matches!(
            ComparisonPair::from_parts(Some(b"x".to_vec()), Some(Vec::new())),
            Err(AnalysisError::MissingImage(ImageRole::Capture))
        ));
    }

    #[test]
    fn from_config_uses_timeout() {
        let config = GeminiConfig {
            api_key: "key".into(),
            timeout_secs: 12,
            ..Default::default()
        };
        let pipeline = AnalysisPipeline::from_config(ScriptedModel::replying(MUG), &config);
        assert_eq!(pipeline.deadline(), Duration::from_secs(12));
        assert!(pipeline.check_ready().is_ok());
    }
}
