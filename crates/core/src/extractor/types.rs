//! Types for the extractor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Platform identifier of the video.
    pub id: String,
    /// Video title.
    pub title: String,
    /// Uploader or channel name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    /// Duration in whole seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    /// Canonical page URL, handed back to the extractor for download.
    pub webpage_url: String,
    /// Available streams.
    #[serde(default)]
    pub streams: Vec<MediaStream>,
}

/// A single stream (format) offered for a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaStream {
    /// Extractor format identifier (e.g. "251").
    pub format_id: String,
    /// Container extension (e.g. "webm", "m4a").
    pub ext: String,
    /// Audio codec, `None` when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acodec: Option<String>,
    /// Video codec, `None` when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcodec: Option<String>,
    /// Average audio bitrate in kbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abr: Option<f64>,
    /// Size in bytes, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
}

impl MediaStream {
    fn codec_present(codec: &Option<String>) -> bool {
        codec.as_deref().is_some_and(|c| !c.is_empty() && c != "none")
    }

    /// Whether the stream carries audio and no video.
    pub fn is_audio_only(&self) -> bool {
        Self::codec_present(&self.acodec) && !Self::codec_present(&self.vcodec)
    }
}

/// A request to materialize one stream on disk.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Page URL of the result.
    pub source_url: String,
    /// Format identifier of the stream to fetch.
    pub format_id: String,
    /// Directory the file is written into.
    pub output_dir: PathBuf,
    /// File name without extension; the extractor appends the container's.
    pub file_stem: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(acodec: Option<&str>, vcodec: Option<&str>) -> MediaStream {
        MediaStream {
            format_id: "1".to_string(),
            ext: "webm".to_string(),
            acodec: acodec.map(str::to_string),
            vcodec: vcodec.map(str::to_string),
            abr: None,
            filesize: None,
        }
    }

    #[test]
    fn test_is_audio_only() {
        assert!(stream(Some("opus"), Some("none")).is_audio_only());
        assert!(stream(Some("mp4a.40.2"), None).is_audio_only());
        assert!(!stream(Some("opus"), Some("vp9")).is_audio_only());
        assert!(!stream(Some("none"), Some("avc1")).is_audio_only());
        assert!(!stream(None, None).is_audio_only());
    }
}
