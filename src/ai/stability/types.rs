//! Stability AI `text-to-image` payload types.

use crate::models::Sampler;
use serde::{Deserialize, Serialize};

pub const FINISH_REASON_SUCCESS: &str = "SUCCESS";

#[derive(Debug, Serialize)]
pub struct TextToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: f32,
    pub height: u32,
    pub width: u32,
    pub samples: u32,
    pub steps: u32,
    pub seed: u32,
    pub sampler: Sampler,
}

#[derive(Debug, Serialize)]
pub struct TextPrompt {
    pub text: String,
    pub weight: f32,
}

#[derive(Debug, Deserialize)]
pub struct TextToImageResponse {
    #[serde(default)]
    pub artifacts: Vec<ImageArtifact>,
}

/// One generated sample. `base64` is absent when the service filtered it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageArtifact {
    pub base64: Option<String>,
    pub seed: Option<u64>,
    pub finish_reason: Option<String>,
}
