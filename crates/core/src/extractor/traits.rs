//! Trait definitions for the extractor module.

use async_trait::async_trait;
use std::path::PathBuf;

use super::error::ExtractorError;
use super::types::{DownloadRequest, SearchResult};

/// Resolves queries to media and downloads selected streams.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Searches for `query`, returning at most `limit` results in ranking order.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, ExtractorError>;

    /// Downloads the requested stream, returning the path of the written file.
    ///
    /// The file is written inside `request.output_dir`.
    async fn download(&self, request: DownloadRequest) -> Result<PathBuf, ExtractorError>;

    /// Validates that the extractor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExtractorError>;
}
