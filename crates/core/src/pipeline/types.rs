//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::PipelineError;
use super::workspace::JobWorkspace;
use crate::extractor::{MediaStream, SearchResult};
use crate::messenger::{ChatId, MessageHandle};

/// Placeholder used when the platform omits a title or uploader.
pub const UNKNOWN: &str = "Unknown";

/// Internally generated identifier of one `/musicas` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stages that run under a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Download,
    Transcode,
    Delivery,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => write!(f, "search"),
            Stage::Download => write!(f, "download"),
            Stage::Transcode => write!(f, "transcode"),
            Stage::Delivery => write!(f, "delivery"),
        }
    }
}

/// One in-flight request. Owned by the task handling it.
#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    pub chat: ChatId,
    /// Trimmed query text.
    pub query: String,
    /// Status message edited as the job progresses.
    pub status: Option<MessageHandle>,
    /// Created right before download.
    pub workspace: Option<JobWorkspace>,
}

impl Job {
    pub fn new(id: JobId, chat: ChatId, query: impl Into<String>) -> Self {
        Self {
            id,
            chat,
            query: query.into(),
            status: None,
            workspace: None,
        }
    }
}

/// Metadata of the chosen result, used verbatim for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    pub author: String,
    pub duration_secs: u32,
    pub source_url: String,
    pub stream: MediaStream,
}

impl TrackDescriptor {
    /// Builds the descriptor from a search result and its selected stream.
    pub fn new(result: &SearchResult, stream: MediaStream) -> Self {
        let or_unknown = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        Self {
            title: or_unknown(Some(result.title.as_str())),
            author: or_unknown(result.uploader.as_deref()),
            duration_secs: result.duration_secs.unwrap_or(0),
            source_url: result.webpage_url.clone(),
            stream,
        }
    }
}

/// What a pipeline run produced.
#[derive(Debug)]
pub struct JobReport {
    pub job_id: JobId,
    pub outcome: Result<TrackDescriptor, PipelineError>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
