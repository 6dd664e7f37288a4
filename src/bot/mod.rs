//! Chat side of the bot
//!
//! Handlers talk to the conversation through [`ChatTransport`], so the same
//! code runs against Telegram ([`TelegramTransport`]) and against the
//! recording [`MockTransport`] in tests.

pub mod handlers;
pub mod mock;
pub mod telegram;

pub use handlers::{Command, GenerationOutcome, PromptInput};
pub use mock::{MockTransport, Outgoing};
pub use telegram::TelegramTransport;

use crate::Result;
use async_trait::async_trait;

/// Handle to a message the bot has sent, used for later edits and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage(pub i32);

/// Outgoing operations on the conversation an update came from.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<SentMessage>;
    async fn send_photo(&self, image: Vec<u8>, caption: &str) -> Result<SentMessage>;
    async fn edit_text(&self, message: SentMessage, text: &str) -> Result<()>;
    async fn delete(&self, message: SentMessage) -> Result<()>;
}
