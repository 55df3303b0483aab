use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - A Telegram token is present (there is no built-in fallback)
/// - Bitrate, search depth and every stage deadline are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.telegram.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "telegram.token is not set (export BOT_TOKEN)".to_string(),
        ));
    }

    if config.pipeline.bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.bitrate_kbps cannot be 0".to_string(),
        ));
    }

    if config.pipeline.search_results == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.search_results cannot be 0".to_string(),
        ));
    }

    let timeouts = &config.pipeline.timeouts;
    for (name, secs) in [
        ("search", timeouts.search_secs),
        ("download", timeouts.download_secs),
        ("transcode", timeouts.transcode_secs),
        ("delivery", timeouts.delivery_secs),
    ] {
        if secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.timeouts.{name}_secs cannot be 0"
            )));
        }
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
