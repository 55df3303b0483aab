//! Mock converter for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, Converter, ConverterError, MediaInfo,
};

/// Bytes written to every output file.
const MOCK_MP3: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x00mock-mp3-frames";

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Whether the input file existed when the job was submitted.
    pub input_existed: bool,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion jobs for assertions
/// - Write real output files so cleanup can be observed
/// - Simulate failures, slow conversions and silent or missing output
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// If set, the next conversion will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Simulated conversion duration.
    delay: Arc<RwLock<Duration>>,
    /// Whether conversions write their output file.
    write_output: Arc<RwLock<bool>>,
    /// Whether probed files report an audio stream.
    output_has_audio: Arc<RwLock<bool>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            write_output: Arc::new(RwLock::new(true)),
            output_has_audio: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated conversion duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Make conversions succeed without writing any output.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Make probes report a file without an audio stream.
    pub async fn set_output_has_audio(&self, has_audio: bool) {
        *self.output_has_audio.write().await = has_audio;
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| ConverterError::InputNotFound {
                path: path.to_path_buf(),
            })?;

        let has_audio = *self.output_has_audio.read().await;

        Ok(MediaInfo {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            duration_secs: 204.0,
            audio_codec: has_audio.then(|| "mp3".to_string()),
            audio_bitrate_kbps: has_audio.then_some(192),
        })
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let input_existed = job.input_path.exists();

        if let Some(err) = self.next_error.write().await.take() {
            self.conversions.write().await.push(RecordedConversion {
                job,
                input_existed,
                success: false,
            });
            return Err(err);
        }

        self.conversions.write().await.push(RecordedConversion {
            job: job.clone(),
            input_existed,
            success: true,
        });

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut size_bytes = 0;
        if *self.write_output.read().await {
            tokio::fs::write(&job.output_path, MOCK_MP3).await?;
            size_bytes = MOCK_MP3.len() as u64;
        }

        Ok(ConversionResult {
            output_path: job.output_path,
            size_bytes,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}
