//! Media search and extraction.
//!
//! This module provides the `MediaExtractor` trait, which resolves a free-text
//! query to ranked results (each carrying its available streams) and
//! materializes a chosen stream on local storage. The production
//! implementation drives the `yt-dlp` binary.

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use traits::MediaExtractor;
pub use types::{DownloadRequest, MediaStream, SearchResult};
pub use ytdlp::YtDlpExtractor;
