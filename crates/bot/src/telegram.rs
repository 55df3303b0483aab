//! Telegram implementation of the messenger seam.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use tracing::debug;

use melodia_core::messenger::{ChatId, MessageHandle, Messenger, MessengerError, OutgoingAudio};

/// Sends messages and audio through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat_id.0)
}

fn request_error(e: teloxide::RequestError) -> MessengerError {
    MessengerError::Request(e.to_string())
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageHandle, MessengerError> {
        let message = self
            .bot
            .send_message(tg_chat(chat_id), text)
            .await
            .map_err(request_error)?;

        Ok(MessageHandle {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn edit_text(&self, handle: &MessageHandle, text: &str) -> Result<(), MessengerError> {
        self.bot
            .edit_message_text(tg_chat(handle.chat_id), MessageId(handle.message_id), text)
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), MessengerError> {
        self.bot
            .delete_message(tg_chat(handle.chat_id), MessageId(handle.message_id))
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn send_audio(&self, chat_id: ChatId, audio: OutgoingAudio) -> Result<(), MessengerError> {
        let size = tokio::fs::metadata(&audio.path).await?.len();
        debug!(path = %audio.path.display(), size_bytes = size, "Uploading audio");

        let mut request = self
            .bot
            .send_audio(tg_chat(chat_id), InputFile::file(&audio.path))
            .title(audio.title)
            .performer(audio.performer)
            .caption(audio.caption);
        if audio.duration_secs > 0 {
            request = request.duration(audio.duration_secs);
        }

        request.await.map_err(request_error)?;
        Ok(())
    }
}
