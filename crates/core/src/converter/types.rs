//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Constant-bitrate MP3 output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mp3Encoding {
    pub bitrate_kbps: u32,
}

impl Mp3Encoding {
    /// The ffmpeg encoder used for every output.
    pub const CODEC: &'static str = "libmp3lame";
    /// Passed to `-id3v2_version`.
    pub const ID3_VERSION: &'static str = "3";
    pub const EXTENSION: &'static str = "mp3";

    pub fn new(bitrate_kbps: u32) -> Self {
        Self { bitrate_kbps }
    }
}

/// ID3 tags written into the output file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Usually the source URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl EmbeddedMetadata {
    /// `-metadata key=value` pairs for every field that is set.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        [
            ("title", &self.title),
            ("artist", &self.artist),
            ("comment", &self.comment),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .flat_map(|pair| ["-metadata".to_string(), pair])
        .collect()
    }
}

/// One transcode request.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Pipeline job owning the files, for log correlation.
    pub job_id: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub encoding: Mp3Encoding,
    pub metadata: Option<EmbeddedMetadata>,
}

/// A finished transcode.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub output_path: PathBuf,
    pub size_bytes: u64,
}

/// What ffprobe reports about a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate_kbps: Option<u32>,
}

impl MediaInfo {
    /// Whether the file carries a decodable audio stream.
    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some() && self.size_bytes > 0
    }
}
