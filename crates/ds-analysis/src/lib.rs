//! # ds-analysis
//!
//! Compares a baseline photo with a new capture using a vision model and
//! decodes the verdict into an [`AnalysisResult`](ds_core::AnalysisResult).
//!
//! - [`VisionModel`]: the seam to the external model
//! - [`GeminiClient`]: the Gemini `generateContent` implementation
//! - [`AnalysisPipeline`]: credential check, encoding, deadline, decoding

pub mod decode;
pub mod error;
pub mod gemini;
pub mod model;
pub mod pipeline;
pub mod prompt;

pub use decode::decode_response;
pub use error::{AnalysisError, ImageRole};
pub use gemini::GeminiClient;
pub use model::{EncodedImage, VisionModel};
pub use pipeline::{AnalysisPipeline, ComparisonPair};
pub use prompt::COMPARISON_PROMPT;
