//! Assistant error types.

use thiserror::Error;

use crate::llm::LlmError;
use crate::messenger::MessengerError;

/// Errors from answering a prompt.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No prompt text was given.
    #[error("Empty prompt")]
    Usage,

    /// No model client is configured.
    #[error("Assistant is not configured")]
    NotConfigured,

    /// The model call failed (auth, quota, network).
    #[error("Upstream model error: {0}")]
    Upstream(#[from] LlmError),

    /// The reply could not be delivered to the chat.
    #[error("Failed to deliver reply: {0}")]
    Delivery(#[from] MessengerError),
}
