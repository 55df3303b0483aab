//! The `/ia` request handler.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::config::AssistantConfig;
use super::error::AssistantError;
use super::messages;
use crate::llm::{CompletionRequest, LlmClient};
use crate::messenger::{split_message, ChatId, Messenger, MAX_MESSAGE_CHARS};

/// Outcome of one `/ia` request.
#[derive(Debug)]
pub struct AskReport {
    /// Number of messages sent to the chat, including error replies.
    pub messages_sent: usize,
    /// The relayed answer, or why there is none.
    pub outcome: Result<String, AssistantError>,
}

/// Relays prompts to an LLM and the answers back to the chat.
pub struct Assistant {
    client: Option<Arc<dyn LlmClient>>,
    messenger: Arc<dyn Messenger>,
    config: AssistantConfig,
}

impl Assistant {
    /// Creates an assistant. With `client` set to `None` every prompt is
    /// answered with a "not configured" notice.
    pub fn new(
        client: Option<Arc<dyn LlmClient>>,
        messenger: Arc<dyn Messenger>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            client,
            messenger,
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Answers `prompt` in `chat`.
    ///
    /// Reply failures are logged and reported in the outcome; this never
    /// panics or retries.
    #[instrument(skip_all, fields(chat_id = %chat))]
    pub async fn ask(&self, chat: ChatId, prompt: &str) -> AskReport {
        let prompt = prompt.trim();
        let mut messages_sent = 0;

        let outcome = match self.answer(prompt).await {
            Ok(text) => {
                let mut delivery = Ok(text.clone());
                for chunk in split_message(&text, MAX_MESSAGE_CHARS) {
                    match self.messenger.send_text(chat, &chunk).await {
                        Ok(_) => messages_sent += 1,
                        Err(e) => {
                            warn!(error = %e, "Failed to deliver assistant reply");
                            delivery = Err(AssistantError::Delivery(e));
                            break;
                        }
                    }
                }
                delivery
            }
            Err(e) => {
                let reply = messages::for_error(&e);
                match self.messenger.send_text(chat, &reply).await {
                    Ok(_) => messages_sent += 1,
                    Err(send_err) => warn!(error = %send_err, "Failed to send assistant error reply"),
                }
                Err(e)
            }
        };

        AskReport {
            messages_sent,
            outcome,
        }
    }

    async fn answer(&self, prompt: &str) -> Result<String, AssistantError> {
        if prompt.is_empty() {
            return Err(AssistantError::Usage);
        }

        let client = self.client.as_ref().ok_or(AssistantError::NotConfigured)?;

        let request = CompletionRequest::new(prompt)
            .with_system(&self.config.system_prompt)
            .with_max_tokens(self.config.llm.max_tokens);

        debug!(provider = client.provider(), model = client.model(), "Sending prompt");

        match client.complete(request).await {
            Ok(response) => {
                info!(
                    model = %response.model,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Assistant answered"
                );
                Ok(response.text)
            }
            Err(e) => {
                error!(error = %e, provider = client.provider(), "LLM call failed");
                Err(AssistantError::Upstream(e))
            }
        }
    }
}
