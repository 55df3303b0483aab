pub mod assistant;
pub mod config;
pub mod converter;
pub mod extractor;
pub mod llm;
pub mod messenger;
pub mod pipeline;
pub mod testing;

pub use assistant::{AskReport, Assistant, AssistantConfig, AssistantError};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use converter::{Converter, ConverterConfig, ConverterError, FfmpegConverter};
pub use extractor::{ExtractorConfig, ExtractorError, MediaExtractor, YtDlpExtractor};
pub use llm::{create_llm_client, LlmClient, LlmConfig, LlmError, LlmProvider};
pub use messenger::{ChatId, MessageHandle, Messenger, MessengerError, OutgoingAudio};
pub use pipeline::{JobReport, Orchestrator, PipelineConfig, PipelineError, TrackDescriptor};
