use super::{ChatTransport, SentMessage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use teloxide::{ApiError, RequestError};

/// One operation a handler performed on the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text(String),
    Photo { image: Vec<u8>, caption: String },
    Edit { message: SentMessage, text: String },
    Delete(SentMessage),
}

/// Records outgoing operations instead of talking to Telegram.
#[derive(Clone, Default)]
pub struct MockTransport {
    outgoing: Arc<Mutex<Vec<Outgoing>>>,
    next_id: Arc<Mutex<i32>>,
    fail_texts: bool,
    fail_photos: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `send_text` fail, as if the chat were unreachable.
    pub fn failing_texts(mut self) -> Self {
        self.fail_texts = true;
        self
    }

    pub fn failing_photos(mut self) -> Self {
        self.fail_photos = true;
        self
    }

    pub fn get_outgoing(&self) -> Vec<Outgoing> {
        self.outgoing.lock().unwrap().clone()
    }

    pub fn get_photos(&self) -> Vec<(Vec<u8>, String)> {
        self.get_outgoing()
            .into_iter()
            .filter_map(|op| match op {
                Outgoing::Photo { image, caption } => Some((image, caption)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: Outgoing) {
        self.outgoing.lock().unwrap().push(op);
    }

    fn allocate_id(&self) -> SentMessage {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        SentMessage(*next_id)
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_text(&self, text: &str) -> Result<SentMessage> {
        if self.fail_texts {
            return Err(Error::Telegram(RequestError::Api(ApiError::BotBlocked)));
        }
        self.record(Outgoing::Text(text.to_string()));
        Ok(self.allocate_id())
    }

    async fn send_photo(&self, image: Vec<u8>, caption: &str) -> Result<SentMessage> {
        if self.fail_photos {
            return Err(Error::Telegram(RequestError::Api(ApiError::Unknown(
                "Bad Request: PHOTO_INVALID_DIMENSIONS".to_string(),
            ))));
        }
        self.record(Outgoing::Photo {
            image,
            caption: caption.to_string(),
        });
        Ok(self.allocate_id())
    }

    async fn edit_text(&self, message: SentMessage, text: &str) -> Result<()> {
        self.record(Outgoing::Edit {
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, message: SentMessage) -> Result<()> {
        self.record(Outgoing::Delete(message));
        Ok(())
    }
}
