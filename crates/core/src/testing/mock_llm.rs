//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Returns a fixed response (or a queued error) and records every request.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    response: Arc<RwLock<String>>,
    next_error: Arc<RwLock<Option<LlmError>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::with_response("mock response")
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that answers every prompt with `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Arc::new(RwLock::new(text.into())),
            next_error: Arc::new(RwLock::new(None)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_response(&self, text: impl Into<String>) {
        *self.response.write().await = text.into();
    }

    /// Configure the next completion to fail with the given error.
    pub async fn set_next_error(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let input_tokens = request.prompt.split_whitespace().count() as u32;
        self.requests.write().await.push(request);

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let text = self.response.read().await.clone();
        Ok(CompletionResponse {
            usage: LlmUsage {
                input_tokens,
                output_tokens: text.split_whitespace().count() as u32,
            },
            text,
            model: "mock-model".to_string(),
        })
    }
}
