//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::types::Stage;

/// Configuration for the download-convert-deliver pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root directory for job workspaces. Each job gets `<download_dir>/<job_id>/`.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Target MP3 bitrate in kbps.
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,

    /// Number of search results requested; the first one is always used.
    #[serde(default = "default_search_results")]
    pub search_results: u32,

    /// Per-stage deadlines.
    #[serde(default)]
    pub timeouts: StageTimeouts,
}

/// Deadline for each pipeline stage, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTimeouts {
    #[serde(default = "default_search_secs")]
    pub search_secs: u64,
    #[serde(default = "default_download_secs")]
    pub download_secs: u64,
    #[serde(default = "default_transcode_secs")]
    pub transcode_secs: u64,
    #[serde(default = "default_delivery_secs")]
    pub delivery_secs: u64,
}

impl StageTimeouts {
    /// Deadline for `stage`.
    pub fn for_stage(&self, stage: Stage) -> Duration {
        let secs = match stage {
            Stage::Search => self.search_secs,
            Stage::Download => self.download_secs,
            Stage::Transcode => self.transcode_secs,
            Stage::Delivery => self.delivery_secs,
        };
        Duration::from_secs(secs)
    }
}

fn default_download_dir() -> PathBuf {
    std::env::temp_dir().join("melodia")
}

fn default_bitrate() -> u32 {
    192
}

fn default_search_results() -> u32 {
    1
}

fn default_search_secs() -> u64 {
    30
}

fn default_download_secs() -> u64 {
    300 // 5 minutes
}

fn default_transcode_secs() -> u64 {
    300
}

fn default_delivery_secs() -> u64 {
    120
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            bitrate_kbps: default_bitrate(),
            search_results: default_search_results(),
            timeouts: StageTimeouts::default(),
        }
    }
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            search_secs: default_search_secs(),
            download_secs: default_download_secs(),
            transcode_secs: default_transcode_secs(),
            delivery_secs: default_delivery_secs(),
        }
    }
}
