use std::sync::Arc;

use melodia_core::{
    Assistant, Config, FfmpegConverter, Orchestrator, SanitizedConfig, YtDlpExtractor,
};

use crate::telegram::TelegramMessenger;

pub type MusicPipeline = Orchestrator<YtDlpExtractor, FfmpegConverter, TelegramMessenger>;

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: MusicPipeline,
    assistant: Assistant,
}

impl AppState {
    pub fn new(config: Config, pipeline: MusicPipeline, assistant: Assistant) -> Arc<Self> {
        Arc::new(Self {
            config,
            pipeline,
            assistant,
        })
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &MusicPipeline {
        &self.pipeline
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }
}
