//! Google Gemini `generateContent` client.

use ds_config::GeminiConfig;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::{EncodedImage, VisionModel};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 3],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

impl<'a> Part<'a> {
    fn image(image: &'a EncodedImage) -> Self {
        Self::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type,
                data: image.data.as_str(),
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts concatenated.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ── Client ─────────────────────────────────────────────────────────

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url,
            self.model,
            urlencoding::encode(api_key)
        )
    }
}

impl VisionModel for GeminiClient {
    async fn submit(
        &self,
        api_key: &str,
        prompt: &str,
        first: &EncodedImage,
        second: &EncodedImage,
    ) -> Result<String, AnalysisError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::Text { text: prompt },
                    Part::image(first),
                    Part::image(second),
                ],
            }],
        };

        tracing::debug!(model = %self.model, "gemini: generateContent");
        let resp = self.http.post(self.endpoint(api_key)).json(&body).send().await?;
        let resp = check_response(resp).await?;
        let raw = resp.text().await?;

        candidate_text(raw)
    }
}

/// Pull the model's text out of a `generateContent` envelope. Failures keep the
/// raw body and log it for diagnosis.
fn candidate_text(raw: String) -> Result<String, AnalysisError> {
    let parsed: GenerateResponse = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(raw = %raw, error = %e, "gemini: unparsable response envelope");
            return Err(AnalysisError::Malformed {
                raw,
                reason: e.to_string(),
            });
        }
    };
    parsed.text().ok_or_else(|| {
        tracing::warn!(raw = %raw, "gemini: response has no candidate text");
        AnalysisError::Malformed {
            raw,
            reason: "response has no candidate text".into(),
        }
    })
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AnalysisError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(AnalysisError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "candidates": [
            {
                "content": {
                    "parts": [
                        {"text": "```json\n{\"stagnantItems\": [\"mug\"],"},
                        {"text": " \"trashItems\": []}\n```"}
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }
        ],
        "usageMetadata": {"promptTokenCount": 1290}
    }"#;

    fn client() -> GeminiClient {
        GeminiClient::new(&GeminiConfig::default()).unwrap()
    }

    #[test]
    fn endpoint_includes_model_and_key() {
        assert_eq!(
            client().endpoint("AIza key"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-001:generateContent?key=AIza%20key"
        );
    }

    #[test]
    fn request_orders_prompt_then_images() {
        let first = EncodedImage::jpeg(b"before");
        let second = EncodedImage::jpeg(b"after");
        let body = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::Text { text: "compare" },
                    Part::image(&first),
                    Part::image(&second),
                ],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "compare");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], first.data.as_str());
        assert_eq!(parts[2]["inlineData"]["data"], second.data.as_str());
    }

    #[test]
    fn parse_concatenates_candidate_parts() {
        let parsed: GenerateResponse = serde_json::from_str(FIXTURE).unwrap();
        let text = parsed.text().unwrap();
        let result = crate::decode_response(&text).unwrap();
        assert_eq!(result.stagnant_items, vec!["mug"]);
        assert!(result.trash_items.is_empty());
    }

    #[test]
    fn no_candidates_has_no_text() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn unparsable_envelope_keeps_raw_body() {
        let raw = "<html>502 Bad Gateway</html>".to_string();
        let err = candidate_text(raw.clone()).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed { raw: ref kept, .. } if *kept == raw));
        assert_eq!(err.kind(), ds_core::FailureKind::AnalysisMalformed);
    }

    #[test]
    fn envelope_without_candidates_is_malformed() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#.to_string();
        assert!(matches!(
            candidate_text(raw),
            Err(AnalysisError::Malformed { ref reason, .. }) if reason == "response has no candidate text"
        ));
        assert!(candidate_text(FIXTURE.to_string()).unwrap().contains("stagnantItems"));
    }

    #[tokio::test]
    async fn error_status_maps_to_api_error() {
        let resp = reqwest::Response::from(
            ::http::Response::builder()
                .status(400)
                .body("API key not valid")
                .unwrap(),
        );
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Api { status: 400, ref message } if message == "API key not valid"));
        assert_eq!(err.kind(), ds_core::FailureKind::AnalysisTransport);
    }
}
