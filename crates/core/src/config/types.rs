use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assistant::AssistantConfig;
use crate::converter::ConverterConfig;
use crate::extractor::ExtractorConfig;
use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot API token. Usually supplied through `BOT_TOKEN`.
    #[serde(default)]
    pub token: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub telegram_token_configured: bool,
    pub download_dir: PathBuf,
    pub bitrate_kbps: u32,
    pub ytdlp_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub assistant: SanitizedAssistantConfig,
    pub logging: LoggingConfig,
}

/// Sanitized assistant config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAssistantConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            telegram_token_configured: !config.telegram.token.trim().is_empty(),
            download_dir: config.pipeline.download_dir.clone(),
            bitrate_kbps: config.pipeline.bitrate_kbps,
            ytdlp_path: config.extractor.ytdlp_path.clone(),
            ffmpeg_path: config.converter.ffmpeg_path.clone(),
            assistant: SanitizedAssistantConfig {
                enabled: config.assistant.enabled,
                provider: config.assistant.llm.provider.to_string(),
                model: config.assistant.llm.model.clone(),
                api_key_configured: config
                    .assistant
                    .llm
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.is_empty()),
            },
            logging: config.logging.clone(),
        }
    }
}
