//! Assistant configuration.

use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;

/// Configuration for the `/ia` assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Whether `/ia` is answered at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fixed system instruction sent with every prompt.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Model client settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_system_prompt() -> String {
    "Você é um assistente útil em um bot do Telegram. \
     Responda de forma clara e objetiva, no mesmo idioma da pergunta."
        .to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            system_prompt: default_system_prompt(),
            llm: LlmConfig::default(),
        }
    }
}
