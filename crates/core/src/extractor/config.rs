//! Configuration for the extractor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the yt-dlp backed extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Netscape cookie jar handed to yt-dlp, for age-gated or throttled content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies_path: Option<PathBuf>,

    /// Additional arguments passed to every yt-dlp invocation.
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_extra_args() -> Vec<String> {
    // DASH/HLS manifests tend to require extra authentication
    vec![
        "--extractor-args".to_string(),
        "youtube:skip=dash,hls".to_string(),
    ]
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            cookies_path: None,
            extra_args: default_extra_args(),
        }
    }
}
