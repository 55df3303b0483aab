//! Mock messenger for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::messenger::{ChatId, MessageHandle, Messenger, MessengerError, OutgoingAudio};

/// Something the code under test did to the chat.
#[derive(Debug, Clone, PartialEq)]
pub enum MessengerEvent {
    Sent {
        handle: MessageHandle,
        text: String,
    },
    Edited {
        handle: MessageHandle,
        text: String,
    },
    Deleted {
        handle: MessageHandle,
    },
    Audio {
        chat_id: ChatId,
        audio: OutgoingAudio,
        /// Whether the file existed when the upload started.
        file_existed: bool,
    },
}

/// Mock implementation of the Messenger trait.
///
/// Records every call in order. Uploads check that the file is really on
/// disk, which lets tests prove cleanup happens after delivery.
#[derive(Debug, Clone, Default)]
pub struct MockMessenger {
    events: Arc<RwLock<Vec<MessengerEvent>>>,
    next_message_id: Arc<AtomicI32>,
    /// If set, every audio upload fails with this message.
    audio_error: Arc<RwLock<Option<String>>>,
    /// If set, every text send and edit fails with this message.
    text_error: Arc<RwLock<Option<String>>>,
    /// Simulated upload latency.
    audio_delay: Arc<RwLock<Duration>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub async fn events(&self) -> Vec<MessengerEvent> {
        self.events.read().await.clone()
    }

    /// Texts of all sent and edited messages, in order.
    pub async fn texts(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|e| match e {
                MessengerEvent::Sent { text, .. } | MessengerEvent::Edited { text, .. } => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// The most recent text shown to the user.
    pub async fn last_text(&self) -> Option<String> {
        self.texts().await.pop()
    }

    /// Audio uploads with whether each file existed at upload time.
    pub async fn audios(&self) -> Vec<(OutgoingAudio, bool)> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|e| match e {
                MessengerEvent::Audio {
                    audio,
                    file_existed,
                    ..
                } => Some((audio.clone(), *file_existed)),
                _ => None,
            })
            .collect()
    }

    /// Number of deleted messages.
    pub async fn deleted_count(&self) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| matches!(e, MessengerEvent::Deleted { .. }))
            .count()
    }

    /// Make every audio upload fail.
    pub async fn set_audio_error(&self, message: impl Into<String>) {
        *self.audio_error.write().await = Some(message.into());
    }

    /// Make every text send and edit fail.
    pub async fn set_text_error(&self, message: impl Into<String>) {
        *self.text_error.write().await = Some(message.into());
    }

    /// Set the simulated upload latency.
    pub async fn set_audio_delay(&self, delay: Duration) {
        *self.audio_delay.write().await = delay;
    }

    async fn check_text_error(&self) -> Result<(), MessengerError> {
        match self.text_error.read().await.as_ref() {
            Some(message) => Err(MessengerError::Request(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageHandle, MessengerError> {
        self.check_text_error().await?;

        let handle = MessageHandle {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
        };
        self.events.write().await.push(MessengerEvent::Sent {
            handle,
            text: text.to_string(),
        });
        Ok(handle)
    }

    async fn edit_text(&self, handle: &MessageHandle, text: &str) -> Result<(), MessengerError> {
        self.check_text_error().await?;

        self.events.write().await.push(MessengerEvent::Edited {
            handle: *handle,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), MessengerError> {
        self.events
            .write()
            .await
            .push(MessengerEvent::Deleted { handle: *handle });
        Ok(())
    }

    async fn send_audio(&self, chat_id: ChatId, audio: OutgoingAudio) -> Result<(), MessengerError> {
        let file_existed = audio.path.exists();

        let delay = *self.audio_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.events.write().await.push(MessengerEvent::Audio {
            chat_id,
            audio,
            file_existed,
        });

        match self.audio_error.read().await.as_ref() {
            Some(message) => Err(MessengerError::Request(message.clone())),
            None => Ok(()),
        }
    }
}
