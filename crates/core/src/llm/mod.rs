//! LLM client abstraction and implementations.

mod config;
mod ollama;
mod openai;

pub use config::{LlmConfig, LlmProvider};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error type for LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Not configured")]
    NotConfigured,

    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (instructions for the model)
    pub system: Option<String>,
    /// User message
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
    /// Token usage
    pub usage: LlmUsage,
    /// Model used
    pub model: String,
}

/// Trait for LLM clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name (e.g., "openai", "ollama")
    fn provider(&self) -> &str;

    /// Model name (e.g., "gpt-4o-mini")
    fn model(&self) -> &str;

    /// Send a completion request and get a text response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Builds the client selected by `config`.
///
/// OpenAI requires an API key; without one this returns `LlmError::NotConfigured`.
pub fn create_llm_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match config.provider {
        LlmProvider::OpenAi => {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .ok_or(LlmError::NotConfigured)?;

            let mut client = OpenAiClient::new(api_key, &config.model).with_timeout(timeout);
            if let Some(ref base) = config.api_base {
                client = client.with_api_base(base);
            }
            Ok(Box::new(client))
        }
        LlmProvider::Ollama => {
            let mut client = OllamaClient::new(&config.model).with_timeout(timeout);
            if let Some(ref base) = config.api_base {
                client = client.with_api_base(base);
            }
            Ok(Box::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("Hello")
            .with_system("You are helpful")
            .with_max_tokens(100);

        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.system, Some("You are helpful".to_string()));
        assert_eq!(request.max_tokens, 100);
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_create_openai_without_key_is_not_configured() {
        let config = LlmConfig::default();
        assert!(matches!(
            create_llm_client(&config),
            Err(LlmError::NotConfigured)
        ));
    }

    #[test]
    fn test_create_openai_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let client = create_llm_client(&config).unwrap();
        assert_eq!(client.provider(), "openai");
        assert_eq!(client.model(), config.model);
    }

    #[test]
    fn test_create_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            model: "llama3".to_string(),
            ..Default::default()
        };
        let client = create_llm_client(&config).unwrap();
        assert_eq!(client.provider(), "ollama");
        assert_eq!(client.model(), "llama3");
    }
}
