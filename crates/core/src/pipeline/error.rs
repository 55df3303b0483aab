//! Error types for the pipeline module.

use thiserror::Error;

use super::types::Stage;
use crate::converter::ConverterError;
use crate::extractor::ExtractorError;
use crate::messenger::MessengerError;

/// Error category reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    NotFound,
    NoAudioStream,
    MediaUnavailable,
    ExtractionFormat,
    Conversion,
    Delivery,
    Timeout,
    Unknown,
}

/// Why a pipeline run did not deliver audio.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query was empty.
    #[error("Empty query")]
    Usage,

    /// The search returned no results.
    #[error("No results for query: {query}")]
    NotFound { query: String },

    /// The chosen result has no audio-only stream.
    #[error("No audio-only stream for: {title}")]
    NoAudioStream { title: String },

    /// The media is removed, private, region-locked or age-gated.
    #[error("Media unavailable: {0}")]
    MediaUnavailable(String),

    /// The extractor could not understand the platform's response.
    #[error("Extraction format error: {0}")]
    ExtractionFormat(String),

    /// Transcoding failed or produced no usable audio.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The audio file could not be uploaded.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// A stage exceeded its deadline.
    #[error("{stage} stage timed out after {timeout_secs}s")]
    Timeout { stage: Stage, timeout_secs: u64 },

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage => ErrorKind::Usage,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoAudioStream { .. } => ErrorKind::NoAudioStream,
            Self::MediaUnavailable(_) => ErrorKind::MediaUnavailable,
            Self::ExtractionFormat(_) => ErrorKind::ExtractionFormat,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::Delivery(_) => ErrorKind::Delivery,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl From<ExtractorError> for PipelineError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::MediaUnavailable { reason } => Self::MediaUnavailable(reason),
            ExtractorError::ExtractionFormat { reason } => Self::ExtractionFormat(reason),
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<ConverterError> for PipelineError {
    fn from(e: ConverterError) -> Self {
        match e {
            ConverterError::Timeout { timeout_secs } => Self::Timeout {
                stage: Stage::Transcode,
                timeout_secs,
            },
            other if other.is_setup_error() => Self::Unknown(other.to_string()),
            other => Self::Conversion(other.to_string()),
        }
    }
}

impl From<MessengerError> for PipelineError {
    fn from(e: MessengerError) -> Self {
        Self::Delivery(e.to_string())
    }
}
