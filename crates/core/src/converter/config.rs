//! Converter configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the ffmpeg tools live and how they are run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Hard limit for one ffmpeg run, independent of the pipeline deadline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value passed to `-loglevel`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Appended to every ffmpeg invocation before the output path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            extra_args: Vec::new(),
        }
    }
}
