//! Error types for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while searching or downloading.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Extractor binary not found.
    #[error("yt-dlp not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// The media is deleted, private, region-locked or otherwise inaccessible.
    #[error("Media unavailable: {reason}")]
    MediaUnavailable { reason: String },

    /// The platform response could not be parsed.
    #[error("Unexpected extractor output: {reason}")]
    ExtractionFormat { reason: String },

    /// The extractor exited with a failure not covered above.
    #[error("yt-dlp exited with code {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    /// The download finished but no artifact was found.
    #[error("Downloaded file not found in {dir}")]
    OutputMissing { dir: PathBuf },

    /// I/O error while running the extractor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Creates a new extraction format error.
    pub fn format(reason: impl Into<String>) -> Self {
        Self::ExtractionFormat {
            reason: reason.into(),
        }
    }

    /// Creates a new media unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::MediaUnavailable {
            reason: reason.into(),
        }
    }
}
