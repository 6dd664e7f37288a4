//! Data models and structures
//!
//! Request-scoped generation types and the environment-driven configuration.
//! Nothing here outlives a single update.

use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_STEPS: u32 = 30;
pub const DEFAULT_CFG_SCALE: f32 = 7.0;
pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;
pub const DEFAULT_SAMPLES: u32 = 1;

/// Diffusion sampler sent with every request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Sampler {
    #[serde(rename = "K_DPMPP_2M")]
    KDpmpp2m,
}

/// One text-to-image call. Built fresh for every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub seed: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub sampler: Sampler,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            seed: time_seed(),
            steps: DEFAULT_STEPS,
            cfg_scale: DEFAULT_CFG_SCALE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            samples: DEFAULT_SAMPLES,
            sampler: Sampler::KDpmpp2m,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

/// Seed taken from the wall clock. Not meant to be unpredictable.
fn time_seed() -> u32 {
    Utc::now().timestamp().rem_euclid(i64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    /// Anything that is not a usable image; carries the service's reason.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub payload: Vec<u8>,
}

impl Artifact {
    pub fn image(payload: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::Image,
            payload,
        }
    }

    pub fn other(reason: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Other(reason.into()),
            payload: Vec::new(),
        }
    }
}

/// One result entry of a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub artifacts: Vec<Artifact>,
}

impl Answer {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }
}

/// Payload of the first image artifact, scanning answers then artifacts in order.
pub fn first_image(answers: &[Answer]) -> Option<&[u8]> {
    answers
        .iter()
        .flat_map(|answer| answer.artifacts.iter())
        .find(|artifact| artifact.kind == ArtifactKind::Image)
        .map(|artifact| artifact.payload.as_slice())
}

// Configuration
pub const DEFAULT_STABILITY_API_HOST: &str = "https://api.stability.ai";
pub const DEFAULT_STABILITY_ENGINE: &str = "stable-diffusion-v1-6";
pub const DEFAULT_STABILITY_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub stability_key: String,
    pub stability_api_host: String,
    pub stability_engine: String,
    pub stability_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("stability_key", &"<redacted>")
            .field("stability_api_host", &self.stability_api_host)
            .field("stability_engine", &self.stability_engine)
            .field("stability_timeout", &self.stability_timeout)
            .finish()
    }
}

impl Config {
    /// Load `.env` if present, then read settings from the process environment.
    pub fn from_env() -> crate::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };

        let stability_timeout = match lookup("STABILITY_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!(
                    "STABILITY_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_STABILITY_TIMEOUT_SECS,
        };

        Ok(Self {
            telegram_token: required("TELEGRAM_TOKEN")?,
            stability_key: required("STABILITY_KEY")?,
            stability_api_host: lookup("STABILITY_API_HOST")
                .unwrap_or_else(|| DEFAULT_STABILITY_API_HOST.to_string()),
            stability_engine: lookup("STABILITY_ENGINE")
                .unwrap_or_else(|| DEFAULT_STABILITY_ENGINE.to_string()),
            stability_timeout: Duration::from_secs(stability_timeout),
        })
    }
}
