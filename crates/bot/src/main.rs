mod commands;
mod handlers;
mod state;
mod telegram;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use melodia_core::{
    config::{LoggingConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH},
    create_llm_client, load_config, validate_config, Assistant, Config, Converter,
    FfmpegConverter, LlmClient, MediaExtractor, Messenger, Orchestrator, YtDlpExtractor,
};

use commands::Command;
use state::AppState;
use telegram::TelegramMessenger;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    // A .env file is optional; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    // Logging is configured from the config file, so it cannot report a load failure.
    let config = match read_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    if let Err(e) = run(config).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn read_config() -> Result<Config> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(config: Config) -> Result<()> {
    validate_config(&config).context("Configuration validation failed")?;

    info!(version = VERSION, "Starting melodia");
    info!(config = ?melodia_core::SanitizedConfig::from(&config), "Configuration loaded");

    tokio::fs::create_dir_all(&config.pipeline.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory {:?}",
                config.pipeline.download_dir
            )
        })?;

    // Missing binaries only warn here.
    let converter = FfmpegConverter::new(config.converter.clone());
    match converter.validate().await {
        Ok(()) => info!("Using converter: {}", converter.name()),
        Err(e) => warn!("Converter not available: {}", e),
    }

    let extractor = YtDlpExtractor::new(config.extractor.clone());
    match extractor.validate().await {
        Ok(()) => info!("Using extractor: {}", extractor.name()),
        Err(e) => warn!("Extractor not available: {}", e),
    }

    let bot = Bot::new(&config.telegram.token);
    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));

    let pipeline = Orchestrator::new(
        config.pipeline.clone(),
        extractor,
        converter,
        Arc::clone(&messenger),
    );

    let llm_client: Option<Arc<dyn LlmClient>> = if config.assistant.enabled {
        match create_llm_client(&config.assistant.llm) {
            Ok(client) => {
                info!(
                    "Using LLM provider {} with model {}",
                    client.provider(),
                    client.model()
                );
                Some(Arc::from(client))
            }
            Err(e) => {
                warn!("Assistant unavailable ({}); /ia will say it is not configured", e);
                None
            }
        }
    } else {
        info!("Assistant disabled");
        None
    };

    let assistant = Assistant::new(
        llm_client,
        messenger as Arc<dyn Messenger>,
        config.assistant.clone(),
    );

    let me = bot
        .get_me()
        .await
        .context("Failed to reach Telegram, check BOT_TOKEN")?;
    info!(
        ia_enabled = assistant.is_configured(),
        "Bot started as @{}",
        me.username()
    );

    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Bot commands registered"),
        Err(e) => warn!("Failed to register bot commands: {}", e),
    }

    let state = AppState::new(config, pipeline, assistant);
    info!(download_dir = ?state.sanitized_config().download_dir, "Waiting for commands");

    let handler = dptree::entry().branch(
        Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handlers::handle_command),
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
