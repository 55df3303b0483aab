//! Ollama client for local models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Ollama client for local LLM inference.
pub struct OllamaClient {
    client: reqwest::Client,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a new Ollama client with the specified model.
    ///
    /// # Arguments
    /// * `model` - Model name (e.g., "llama3", "mistral")
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            api_base: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Set a custom API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    /// Number of tokens in the response
    #[serde(default)]
    eval_count: u32,
    /// Number of tokens in the prompt
    #[serde(default)]
    prompt_eval_count: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorResponse {
    error: String,
}

fn parse_generate_response(body: &str) -> Result<CompletionResponse, LlmError> {
    let parsed: OllamaResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Json(e.to_string()))?;

    if parsed.response.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(CompletionResponse {
        text: parsed.response,
        usage: LlmUsage {
            input_tokens: parsed.prompt_eval_count,
            output_tokens: parsed.eval_count,
        },
        model: parsed.model,
    })
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let ollama_request = OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt,
            system: request.system,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.api_base))
            .timeout(self.timeout)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        if status != 200 {
            let message = serde_json::from_str::<OllamaErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api { status, message });
        }

        parse_generate_response(&body)
    }
}
