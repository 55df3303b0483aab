//! Mock extractor for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::extractor::{DownloadRequest, ExtractorError, MediaExtractor, SearchResult};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was searched.
    pub query: String,
    /// Number of results requested.
    pub limit: u32,
}

/// A recorded download for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedDownload {
    /// The request that was made.
    pub request: DownloadRequest,
    /// Where the file was written, if the download succeeded.
    pub path: Option<PathBuf>,
}

/// Mock implementation of the MediaExtractor trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results
/// - Write real files on download, named like yt-dlp would
/// - Track searches and downloads for assertions
/// - Simulate failures and delays
///
/// A failing or slow download leaves a `.part` file behind first, the way an
/// interrupted yt-dlp run does.
///
/// # Example
///
/// ```rust,ignore
/// use melodia_core::testing::{fixtures, MockExtractor};
///
/// let extractor = MockExtractor::new();
/// extractor.set_results(vec![fixtures::search_result("Believer", "ImagineDragonsVEVO", 204)]).await;
///
/// let results = extractor.search("believer", 1).await?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(extractor.recorded_searches().await[0].query, "believer");
/// ```
#[derive(Debug, Clone)]
pub struct MockExtractor {
    /// Configured results to return.
    results: Arc<RwLock<Vec<SearchResult>>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// Recorded downloads.
    downloads: Arc<RwLock<Vec<RecordedDownload>>>,
    /// If set, the next search will fail with this error.
    next_search_error: Arc<RwLock<Option<ExtractorError>>>,
    /// If set, the next download will fail with this error.
    next_download_error: Arc<RwLock<Option<ExtractorError>>>,
    /// Simulated search latency.
    search_delay: Arc<RwLock<Duration>>,
    /// Simulated download latency.
    download_delay: Arc<RwLock<Duration>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a new mock extractor with no results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            downloads: Arc::new(RwLock::new(Vec::new())),
            next_search_error: Arc::new(RwLock::new(None)),
            next_download_error: Arc::new(RwLock::new(None)),
            search_delay: Arc::new(RwLock::new(Duration::ZERO)),
            download_delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Set the results returned by every search.
    pub async fn set_results(&self, results: Vec<SearchResult>) {
        *self.results.write().await = results;
    }

    /// Get all recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Get all recorded downloads.
    pub async fn recorded_downloads(&self) -> Vec<RecordedDownload> {
        self.downloads.read().await.clone()
    }

    /// Get the number of downloads attempted.
    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_search_error(&self, error: ExtractorError) {
        *self.next_search_error.write().await = Some(error);
    }

    /// Configure the next download to fail with the given error.
    pub async fn set_next_download_error(&self, error: ExtractorError) {
        *self.next_download_error.write().await = Some(error);
    }

    /// Set the simulated search latency.
    pub async fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.write().await = delay;
    }

    /// Set the simulated download latency.
    pub async fn set_download_delay(&self, delay: Duration) {
        *self.download_delay.write().await = delay;
    }

    async fn extension_for(&self, request: &DownloadRequest) -> String {
        self.results
            .read()
            .await
            .iter()
            .filter(|r| r.webpage_url == request.source_url)
            .flat_map(|r| r.streams.iter())
            .find(|s| s.format_id == request.format_id)
            .map(|s| s.ext.clone())
            .unwrap_or_else(|| "webm".to_string())
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, ExtractorError> {
        self.searches.write().await.push(RecordedSearch {
            query: query.to_string(),
            limit,
        });

        let delay = *self.search_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_search_error.write().await.take() {
            return Err(err);
        }

        let results = self.results.read().await;
        Ok(results.iter().take(limit as usize).cloned().collect())
    }

    async fn download(&self, request: DownloadRequest) -> Result<PathBuf, ExtractorError> {
        let ext = self.extension_for(&request).await;
        let path = request
            .output_dir
            .join(format!("{}.{}", request.file_stem, ext));
        let partial = request
            .output_dir
            .join(format!("{}.{}.part", request.file_stem, ext));

        let delay = *self.download_delay.read().await;
        let error = self.next_download_error.write().await.take();

        if !delay.is_zero() || error.is_some() {
            tokio::fs::write(&partial, b"partial").await?;
        }

        // Record before sleeping so a timed-out download is still visible.
        let index = {
            let mut downloads = self.downloads.write().await;
            downloads.push(RecordedDownload {
                request: request.clone(),
                path: None,
            });
            downloads.len() - 1
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = error {
            return Err(err);
        }

        if tokio::fs::try_exists(&partial).await.unwrap_or(false) {
            tokio::fs::rename(&partial, &path).await?;
        } else {
            tokio::fs::write(&path, b"mock media stream").await?;
        }

        if let Some(recorded) = self.downloads.write().await.get_mut(index) {
            recorded.path = Some(path.clone());
        }

        Ok(path)
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        Ok(())
    }
}
