use super::{ChatTransport, SentMessage};
use crate::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};

/// [`ChatTransport`] bound to a single Telegram chat.
pub struct TelegramTransport {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramTransport {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, text: &str) -> Result<SentMessage> {
        let sent = self.bot.send_message(self.chat_id, text).await?;
        Ok(SentMessage(sent.id.0))
    }

    async fn send_photo(&self, image: Vec<u8>, caption: &str) -> Result<SentMessage> {
        let sent = self
            .bot
            .send_photo(self.chat_id, InputFile::memory(image).file_name("image.png"))
            .caption(caption)
            .await?;
        Ok(SentMessage(sent.id.0))
    }

    async fn edit_text(&self, message: SentMessage, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(self.chat_id, MessageId(message.0), text)
            .await?;
        Ok(())
    }

    async fn delete(&self, message: SentMessage) -> Result<()> {
        self.bot
            .delete_message(self.chat_id, MessageId(message.0))
            .await?;
        Ok(())
    }
}
