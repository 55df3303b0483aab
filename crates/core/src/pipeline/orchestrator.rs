//! The `/musicas` job runner.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::config::PipelineConfig;
use super::error::{ErrorKind, PipelineError};
use super::messages;
use super::select::{sanitize_file_stem, select_audio_stream};
use super::types::{Job, JobId, JobReport, Stage, TrackDescriptor};
use super::workspace::JobWorkspace;
use crate::converter::{ConversionJob, Converter, EmbeddedMetadata, Mp3Encoding};
use crate::extractor::{DownloadRequest, MediaExtractor};
use crate::messenger::{ChatId, MessageHandle, Messenger, OutgoingAudio};

/// Runs search, stream selection, download, transcode and delivery for one
/// query, then removes every temporary artifact.
pub struct Orchestrator<E: MediaExtractor, C: Converter, M: Messenger + ?Sized> {
    config: PipelineConfig,
    extractor: Arc<E>,
    converter: Arc<C>,
    messenger: Arc<M>,
}

impl<E, C, M> Orchestrator<E, C, M>
where
    E: MediaExtractor,
    C: Converter,
    M: Messenger + ?Sized,
{
    pub fn new(config: PipelineConfig, extractor: E, converter: C, messenger: Arc<M>) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            converter: Arc::new(converter),
            messenger,
        }
    }

    /// Handles one `/musicas` request from `chat`.
    ///
    /// Always sends the user either the audio or an error text, and never
    /// returns before the job's workspace has been removed.
    pub async fn run(&self, chat: ChatId, query: &str) -> JobReport {
        let job_id = JobId::new();
        let span = info_span!("job", job_id = %job_id, chat_id = %chat);
        self.run_job(job_id, chat, query).instrument(span).await
    }

    async fn run_job(&self, job_id: JobId, chat: ChatId, query: &str) -> JobReport {
        let query = query.trim();
        if query.is_empty() {
            let error = PipelineError::Usage;
            self.send_best_effort(chat, &messages::error_text(&error)).await;
            return JobReport {
                job_id,
                outcome: Err(error),
            };
        }

        info!(query, "Job started");

        let mut job = Job::new(job_id, chat, query);
        job.status = self.send_best_effort(chat, &messages::searching(query)).await;

        let outcome = self.execute(&mut job).await;

        if let Some(workspace) = job.workspace.take() {
            workspace.cleanup().await;
        }

        self.finalize(&job, &outcome).await;

        JobReport {
            job_id: job.id,
            outcome,
        }
    }

    async fn execute(&self, job: &mut Job) -> Result<TrackDescriptor, PipelineError> {
        let status = job.status;

        // Search
        let results = self
            .within(
                Stage::Search,
                self.extractor.search(&job.query, self.config.search_results),
            )
            .await?;

        let result = results.into_iter().next().ok_or_else(|| PipelineError::NotFound {
            query: job.query.clone(),
        })?;

        // Stream selection
        let stream = select_audio_stream(&result)
            .cloned()
            .ok_or_else(|| PipelineError::NoAudioStream {
                title: result.title.clone(),
            })?;
        let track = TrackDescriptor::new(&result, stream);

        info!(
            title = %track.title,
            author = %track.author,
            duration_secs = track.duration_secs,
            format_id = %track.stream.format_id,
            abr = ?track.stream.abr,
            "Selected audio stream"
        );
        self.update_status(status, &messages::found(&track)).await;

        // Download
        let workspace = job.workspace.insert(
            JobWorkspace::create(&self.config.download_dir, &job.id)
                .await
                .map_err(|e| PipelineError::Unknown(format!("failed to create job workspace: {e}")))?,
        );
        let stem = sanitize_file_stem(&track.title);

        self.update_status(status, &messages::downloading(&track)).await;
        let request = DownloadRequest {
            source_url: track.source_url.clone(),
            format_id: track.stream.format_id.clone(),
            output_dir: workspace.dir().to_path_buf(),
            file_stem: stem.clone(),
        };
        let downloaded = self.within(Stage::Download, self.extractor.download(request)).await?;
        workspace.register(&downloaded);
        debug!(path = %downloaded.display(), "Downloaded source media");

        // Transcode
        self.update_status(status, &messages::converting(&track)).await;
        let mut output = workspace.path_for(&stem, Mp3Encoding::EXTENSION);
        if output == downloaded {
            output = workspace.path_for(
                &format!("{stem}.{}k", self.config.bitrate_kbps),
                Mp3Encoding::EXTENSION,
            );
        }
        workspace.register(&output);

        let conversion = ConversionJob {
            job_id: job.id.to_string(),
            input_path: downloaded,
            output_path: output,
            encoding: Mp3Encoding::new(self.config.bitrate_kbps),
            metadata: Some(EmbeddedMetadata {
                title: Some(track.title.clone()),
                artist: Some(track.author.clone()),
                comment: Some(track.source_url.clone()),
            }),
        };
        let converter = Arc::clone(&self.converter);
        let probed = self
            .within(Stage::Transcode, async move {
                match converter.convert(conversion).await {
                    Ok(converted) => {
                        debug!(size_bytes = converted.size_bytes, "Conversion finished");
                        converter.probe(&converted.output_path).await
                    }
                    Err(e) => Err(e),
                }
            })
            .await?;

        if !probed.has_audio() {
            return Err(PipelineError::Conversion(format!(
                "output {} has no audio stream",
                probed.path.display()
            )));
        }
        info!(
            size_bytes = probed.size_bytes,
            duration_secs = probed.duration_secs,
            bitrate_kbps = ?probed.audio_bitrate_kbps,
            "Transcoded to MP3"
        );

        // Delivery
        self.update_status(status, &messages::sending(&track)).await;
        let audio = OutgoingAudio {
            path: probed.path,
            title: track.title.clone(),
            performer: track.author.clone(),
            duration_secs: track.duration_secs,
            caption: messages::caption(&track),
        };
        self.within(Stage::Delivery, self.messenger.send_audio(job.chat, audio))
            .await?;

        Ok(track)
    }

    /// Awaits `fut` under the deadline configured for `stage`.
    async fn within<T, Cause, F>(&self, stage: Stage, fut: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, Cause>>,
        Cause: Into<PipelineError>,
    {
        let limit = self.config.timeouts.for_stage(stage);
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(PipelineError::Timeout {
                stage,
                timeout_secs: limit.as_secs(),
            }),
        }
    }

    async fn finalize(&self, job: &Job, outcome: &Result<TrackDescriptor, PipelineError>) {
        match outcome {
            Ok(track) => {
                info!(title = %track.title, "Job completed");
                if let Some(handle) = job.status {
                    if let Err(e) = self.messenger.delete(&handle).await {
                        debug!(error = %e, "Failed to delete status message");
                    }
                }
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Unknown => error!(error = ?e, query = %job.query, "Job failed"),
                    _ => warn!(error = %e, "Job failed"),
                }

                let text = messages::error_text(e);
                let edited = match job.status {
                    Some(handle) => self.messenger.edit_text(&handle, &text).await.is_ok(),
                    None => false,
                };
                if !edited {
                    self.send_best_effort(job.chat, &text).await;
                }
            }
        }
    }

    async fn send_best_effort(&self, chat: ChatId, text: &str) -> Option<MessageHandle> {
        match self.messenger.send_text(chat, text).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Failed to send message");
                None
            }
        }
    }

    async fn update_status(&self, status: Option<MessageHandle>, text: &str) {
        if let Some(handle) = status {
            if let Err(e) = self.messenger.edit_text(&handle, text).await {
                debug!(error = %e, "Failed to update status message");
            }
        }
    }
}
