//! Image generation service integration
//!
//! The bot only depends on [`ImageGenerationService`]; the Stability AI
//! client implements it for production and [`MockImageGenerationClient`]
//! for tests.

pub mod mock;
pub mod stability;

pub use mock::MockImageGenerationClient;
pub use stability::StabilityImageClient;

use crate::models::{Answer, GenerationRequest};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Run one text-to-image call. Answers and their artifacts keep the
    /// order the service returned them in.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Answer>>;
}
