use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "MELODIA_CONFIG";

/// Configuration file used when `MELODIA_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "melodia.toml";

/// Load configuration from defaults, an optional TOML file and the environment.
///
/// Precedence (lowest first):
/// - built-in defaults
/// - the TOML file at `path`, skipped when it does not exist
/// - `MELODIA_`-prefixed variables, nested on `__` (`MELODIA_PIPELINE__DOWNLOAD_DIR`)
/// - `BOT_TOKEN` and `OPENAI_API_KEY`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults and environment");
    }

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MELODIA_").split("__"))
        .merge(
            Env::raw()
                .only(&["BOT_TOKEN"])
                .map(|_| "telegram.token".into()),
        )
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "assistant.llm.api_key".into()),
        )
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string(toml_str))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[telegram]
token = "42:token"

[pipeline]
download_dir = "/tmp/melodia-test"
bitrate_kbps = 128
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.telegram.token, "42:token");
        assert_eq!(config.pipeline.download_dir, PathBuf::from("/tmp/melodia-test"));
        assert_eq!(config.pipeline.bitrate_kbps, 128);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[pipeline]
bitrate_kbps = "loud"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[telegram]
token = "7:file"

[assistant]
enabled = false
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!(!config.assistant.enabled);
        assert!(!config.telegram.token.is_empty());
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BOT_TOKEN", "99:from-env");
            let config = load_config(Path::new("/nonexistent/melodia.toml")).unwrap();
            assert_eq!(config.telegram.token, "99:from-env");
            assert_eq!(config.pipeline.bitrate_kbps, 192);
            Ok(())
        });
    }

    #[test]
    fn test_load_config_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "melodia.toml",
                r#"
[telegram]
token = "1:file"

[pipeline]
bitrate_kbps = 128
"#,
            )?;
            jail.set_env("BOT_TOKEN", "2:env");
            jail.set_env("OPENAI_API_KEY", "sk-env");
            jail.set_env("MELODIA_PIPELINE__BITRATE_KBPS", "256");

            let config = load_config(Path::new("melodia.toml")).unwrap();
            assert_eq!(config.telegram.token, "2:env");
            assert_eq!(config.pipeline.bitrate_kbps, 256);
            assert_eq!(config.assistant.llm.api_key.as_deref(), Some("sk-env"));
            Ok(())
        });
    }
}
