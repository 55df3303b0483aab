//! Trait definitions for the messenger module.

use async_trait::async_trait;

use super::types::{ChatId, MessageHandle, MessengerError, OutgoingAudio};

/// Sends, edits and deletes chat messages and uploads audio.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a plain text message and returns a handle for later edits.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageHandle, MessengerError>;

    /// Replaces the text of a previously sent message.
    async fn edit_text(&self, handle: &MessageHandle, text: &str) -> Result<(), MessengerError>;

    /// Deletes a previously sent message.
    async fn delete(&self, handle: &MessageHandle) -> Result<(), MessengerError>;

    /// Uploads an audio file with its metadata.
    async fn send_audio(&self, chat_id: ChatId, audio: OutgoingAudio) -> Result<(), MessengerError>;
}
