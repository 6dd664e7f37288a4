use super::client::StabilityHttpClient;
use super::types::{
    ImageArtifact, TextPrompt, TextToImageRequest, TextToImageResponse, FINISH_REASON_SUCCESS,
};
use crate::ai::ImageGenerationService;
use crate::models::{Answer, Artifact, ArtifactKind, GenerationRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct StabilityImageClient {
    http: StabilityHttpClient,
    engine: String,
}

impl StabilityImageClient {
    pub fn new(api_key: String, engine: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: StabilityHttpClient::new(api_key, timeout)?,
            engine,
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn endpoint(&self) -> String {
        format!("/v1/generation/{}/text-to-image", self.engine)
    }
}

fn decode_artifact(artifact: ImageArtifact) -> Result<Artifact> {
    let reason = artifact
        .finish_reason
        .unwrap_or_else(|| FINISH_REASON_SUCCESS.to_string());

    match artifact.base64 {
        Some(data) if reason == FINISH_REASON_SUCCESS => {
            use base64::Engine as _;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| Error::AiProvider(format!("Failed to decode base64 image: {}", e)))?;
            Ok(Artifact::image(bytes))
        }
        _ => {
            tracing::warn!(
                finish_reason = %reason,
                seed = ?artifact.seed,
                "Stability AI returned an artifact without a usable image"
            );
            Ok(Artifact::other(reason))
        }
    }
}

#[async_trait]
impl ImageGenerationService for StabilityImageClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Answer>> {
        let body = TextToImageRequest {
            text_prompts: vec![TextPrompt {
                text: request.prompt.clone(),
                weight: 1.0,
            }],
            cfg_scale: request.cfg_scale,
            height: request.height,
            width: request.width,
            samples: request.samples,
            steps: request.steps,
            seed: request.seed,
            sampler: request.sampler,
        };

        tracing::debug!(
            engine = %self.engine,
            seed = request.seed,
            "Sending text-to-image request to Stability AI"
        );

        let response: TextToImageResponse = self.http.post(&self.endpoint(), &body).await?;

        // A bad payload only fails the call when no artifact decodes to an image.
        let mut decode_error = None;
        let artifacts: Vec<Artifact> = response
            .artifacts
            .into_iter()
            .map(|artifact| match decode_artifact(artifact) {
                Ok(artifact) => artifact,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable artifact");
                    let skipped = Artifact::other(e.to_string());
                    decode_error.get_or_insert(e);
                    skipped
                }
            })
            .collect();

        if let Some(e) = decode_error {
            if !artifacts.iter().any(|a| a.kind == ArtifactKind::Image) {
                return Err(e);
            }
        }

        Ok(vec![Answer::new(artifacts)])
    }
}
