//! Pipeline lifecycle integration tests.
//!
//! These tests run the orchestrator against mock extractor, converter and
//! messenger that write real files, and check:
//! - What the user sees for each outcome
//! - That delivered metadata matches the chosen result
//! - That no artifact survives a job, whatever happened to it
//! - Stage deadlines and task cancellation

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use melodia_core::{
    converter::ConverterError,
    extractor::ExtractorError,
    messenger::ChatId,
    pipeline::{ErrorKind, Orchestrator, PipelineConfig, PipelineError, Stage},
    testing::{fixtures, MessengerEvent, MockConverter, MockExtractor, MockMessenger},
};

const CHAT: ChatId = ChatId(4242);

/// Test helper wiring an orchestrator to mocks and a scratch download dir.
struct TestHarness {
    orchestrator: Orchestrator<MockExtractor, MockConverter, MockMessenger>,
    extractor: MockExtractor,
    converter: MockConverter,
    messenger: Arc<MockMessenger>,
    download_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    fn with_config(mut config: PipelineConfig) -> Self {
        let download_dir = TempDir::new().expect("Failed to create download dir");
        config.download_dir = download_dir.path().to_path_buf();

        let extractor = MockExtractor::new();
        let converter = MockConverter::new();
        let messenger = Arc::new(MockMessenger::new());

        let orchestrator = Orchestrator::new(
            config,
            extractor.clone(),
            converter.clone(),
            Arc::clone(&messenger),
        );

        Self {
            orchestrator,
            extractor,
            converter,
            messenger,
            download_dir,
        }
    }

    async fn with_believer(self) -> Self {
        self.extractor
            .set_results(vec![fixtures::search_result(
                "Imagine Dragons - Believer (Official Music Video)",
                "ImagineDragonsVEVO",
                204,
            )])
            .await;
        self
    }

    fn leftover_entries(&self) -> usize {
        count_entries(self.download_dir.path())
    }
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("download dir exists").count()
}

fn short_timeouts() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.timeouts.search_secs = 1;
    config.timeouts.download_secs = 1;
    config.timeouts.transcode_secs = 1;
    config.timeouts.delivery_secs = 1;
    config
}

// =============================================================================
// Success path
// =============================================================================

#[tokio::test]
async fn test_believer_is_delivered_with_its_metadata() {
    let harness = TestHarness::new().with_believer().await;

    let report = harness
        .orchestrator
        .run(CHAT, "Imagine Dragons - Believer")
        .await;

    let track = report.outcome.expect("job should succeed");
    assert_eq!(track.title, "Imagine Dragons - Believer (Official Music Video)");
    assert_eq!(track.author, "ImagineDragonsVEVO");
    assert_eq!(track.duration_secs, 204);
    assert_eq!(track.stream.format_id, "251");

    let searches = harness.extractor.recorded_searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].query, "Imagine Dragons - Believer");
    assert_eq!(searches[0].limit, 1);

    let downloads = harness.extractor.recorded_downloads().await;
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].request.format_id, "251");
    assert_eq!(
        downloads[0].request.file_stem,
        "Imagine Dragons - Believer (Official Music Video)"
    );

    let conversions = harness.converter.recorded_conversions().await;
    assert_eq!(conversions.len(), 1);
    let job = &conversions[0].job;
    assert!(conversions[0].input_existed);
    assert_eq!(job.encoding.bitrate_kbps, 192);
    assert_eq!(job.output_path.extension().unwrap(), "mp3");
    let metadata = job.metadata.as_ref().unwrap();
    assert_eq!(metadata.title.as_deref(), Some(track.title.as_str()));
    assert_eq!(metadata.artist.as_deref(), Some("ImagineDragonsVEVO"));

    let audios = harness.messenger.audios().await;
    assert_eq!(audios.len(), 1);
    let (audio, file_existed) = &audios[0];
    assert!(file_existed, "file must exist while uploading");
    assert_eq!(audio.title, track.title);
    assert_eq!(audio.performer, track.author);
    assert_eq!(audio.duration_secs, 204);
    assert_eq!(audio.caption, "🎵 Imagine Dragons - Believer (Official Music Video)");

    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_status_message_walks_through_stages_and_is_deleted() {
    let harness = TestHarness::new().with_believer().await;

    harness.orchestrator.run(CHAT, "believer").await;

    let events = harness.messenger.events().await;
    let status = match &events[0] {
        MessengerEvent::Sent { handle, text } => {
            assert!(text.contains("Procurando por: believer"));
            *handle
        }
        other => panic!("expected status message first, got {other:?}"),
    };

    let edits: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            MessengerEvent::Edited { handle, text } if *handle == status => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(edits.len(), 4);
    assert!(edits[0].contains("Música encontrada"));
    assert!(edits[0].contains("3:24"));
    assert!(edits[1].contains("Baixando"));
    assert!(edits[2].contains("Convertendo"));
    assert!(edits[3].contains("Enviando"));

    assert!(matches!(
        events.last(),
        Some(MessengerEvent::Deleted { handle }) if *handle == status
    ));
}

#[tokio::test]
async fn test_sequential_jobs_are_independent() {
    let harness = TestHarness::new().with_believer().await;

    let first = harness.orchestrator.run(CHAT, "believer").await;
    let second = harness.orchestrator.run(CHAT, "believer").await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert_ne!(first.job_id, second.job_id);
    assert_eq!(harness.messenger.audios().await.len(), 2);
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_concurrent_jobs_with_same_title_do_not_collide() {
    let harness = TestHarness::new().with_believer().await;

    let (a, b) = tokio::join!(
        harness.orchestrator.run(ChatId(1), "believer"),
        harness.orchestrator.run(ChatId(2), "believer"),
    );

    assert!(a.is_success());
    assert!(b.is_success());

    let conversions = harness.converter.recorded_conversions().await;
    assert_eq!(conversions.len(), 2);
    assert_ne!(conversions[0].job.output_path, conversions[1].job.output_path);
    assert_ne!(conversions[0].job.input_path, conversions[1].job.input_path);

    let audios = harness.messenger.audios().await;
    assert_eq!(audios.len(), 2);
    assert!(audios.iter().all(|(_, existed)| *existed));
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_status_failures_do_not_stop_delivery() {
    let harness = TestHarness::new().with_believer().await;
    harness.messenger.set_text_error("message can't be edited").await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert!(report.is_success());
    assert_eq!(harness.messenger.audios().await.len(), 1);
    assert_eq!(harness.messenger.deleted_count().await, 0);
    assert_eq!(harness.leftover_entries(), 0);
}

// =============================================================================
// Domain errors
// =============================================================================

#[tokio::test]
async fn test_empty_query_is_usage_error() {
    let harness = TestHarness::new().with_believer().await;

    let report = harness.orchestrator.run(CHAT, "   ").await;

    assert!(matches!(report.outcome, Err(PipelineError::Usage)));
    assert!(harness.extractor.recorded_searches().await.is_empty());
    assert_eq!(harness.extractor.download_count().await, 0);
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert_eq!(harness.leftover_entries(), 0);

    let texts = harness.messenger.texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("/musicas"));
}

#[tokio::test]
async fn test_no_results_is_not_found_without_download() {
    let harness = TestHarness::new();

    let report = harness.orchestrator.run(CHAT, "asdfghjkl qwerty").await;

    assert!(matches!(
        report.outcome,
        Err(PipelineError::NotFound { ref query }) if query == "asdfghjkl qwerty"
    ));
    assert_eq!(harness.extractor.download_count().await, 0);
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert!(harness.messenger.audios().await.is_empty());
    assert!(harness
        .messenger
        .last_text()
        .await
        .unwrap()
        .contains("Nenhum resultado"));
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_result_without_audio_stream() {
    let harness = TestHarness::new();
    harness
        .extractor
        .set_results(vec![fixtures::video_only_result("Silent Film")])
        .await;

    let report = harness.orchestrator.run(CHAT, "silent film").await;

    assert_eq!(
        report.outcome.unwrap_err().kind(),
        ErrorKind::NoAudioStream
    );
    assert_eq!(harness.extractor.download_count().await, 0);
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_failure_edits_status_message_with_error_text() {
    let harness = TestHarness::new();

    harness.orchestrator.run(CHAT, "nothing matches").await;

    let events = harness.messenger.events().await;
    let MessengerEvent::Sent { handle: status, .. } = events[0].clone() else {
        panic!("expected status message first");
    };
    assert!(matches!(
        events.last(),
        Some(MessengerEvent::Edited { handle, text })
            if *handle == status && text.contains("Nenhum resultado")
    ));
    assert_eq!(harness.messenger.deleted_count().await, 0);
}

#[tokio::test]
async fn test_search_failure_is_categorized() {
    let harness = TestHarness::new();
    harness
        .extractor
        .set_next_search_error(ExtractorError::format("Unable to extract initial data"))
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(
        report.outcome.unwrap_err().kind(),
        ErrorKind::ExtractionFormat
    );
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_unexpected_failure_shows_error_detail() {
    let harness = TestHarness::new();
    harness
        .extractor
        .set_next_search_error(ExtractorError::CommandFailed {
            code: Some(1),
            stderr: "HTTP Error 403: Forbidden".to_string(),
        })
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(report.outcome.unwrap_err().kind(), ErrorKind::Unknown);
    let last = harness.messenger.last_text().await.unwrap();
    assert!(last.starts_with("❌ Erro ao baixar a música: "));
    assert!(last.contains("HTTP Error 403"));
    assert_eq!(harness.leftover_entries(), 0);
}

// =============================================================================
// Cleanup on failure
// =============================================================================

#[tokio::test]
async fn test_download_failure_removes_partial_file() {
    let harness = TestHarness::new().with_believer().await;
    harness
        .extractor
        .set_next_download_error(ExtractorError::unavailable(
            "Video unavailable. This video is private",
        ))
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(
        report.outcome.unwrap_err().kind(),
        ErrorKind::MediaUnavailable
    );
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_conversion_failure_removes_download() {
    let harness = TestHarness::new().with_believer().await;
    harness
        .converter
        .set_next_error(ConverterError::conversion_failed(
            "ffmpeg exited with code 1",
            Some("Invalid data found when processing input".to_string()),
        ))
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(report.outcome.unwrap_err().kind(), ErrorKind::Conversion);
    assert!(harness.messenger.audios().await.is_empty());
    assert!(harness
        .messenger
        .last_text()
        .await
        .unwrap()
        .contains("Erro ao processar o arquivo de áudio"));
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_missing_transcoder_output_is_conversion_error() {
    let harness = TestHarness::new().with_believer().await;
    harness.converter.set_write_output(false).await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(report.outcome.unwrap_err().kind(), ErrorKind::Conversion);
    assert!(harness.messenger.audios().await.is_empty());
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_output_without_audio_is_conversion_error() {
    let harness = TestHarness::new().with_believer().await;
    harness.converter.set_output_has_audio(false).await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(report.outcome.unwrap_err().kind(), ErrorKind::Conversion);
    assert!(harness.messenger.audios().await.is_empty());
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_upload_failure_is_delivery_error() {
    let harness = TestHarness::new().with_believer().await;
    harness
        .messenger
        .set_audio_error("Bad Request: file is too big")
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert_eq!(report.outcome.unwrap_err().kind(), ErrorKind::Delivery);
    let audios = harness.messenger.audios().await;
    assert_eq!(audios.len(), 1);
    assert!(audios[0].1);
    assert_eq!(harness.leftover_entries(), 0);
}

// =============================================================================
// Deadlines and cancellation
// =============================================================================

#[tokio::test]
async fn test_slow_download_times_out_and_is_cleaned() {
    let harness = TestHarness::with_config(short_timeouts()).with_believer().await;
    harness
        .extractor
        .set_download_delay(Duration::from_secs(3))
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert!(matches!(
        report.outcome,
        Err(PipelineError::Timeout {
            stage: Stage::Download,
            timeout_secs: 1
        })
    ));
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert!(harness
        .messenger
        .last_text()
        .await
        .unwrap()
        .contains("download"));
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_slow_transcode_times_out_and_is_cleaned() {
    let harness = TestHarness::with_config(short_timeouts()).with_believer().await;
    harness.converter.set_delay(Duration::from_secs(3)).await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert!(matches!(
        report.outcome,
        Err(PipelineError::Timeout {
            stage: Stage::Transcode,
            ..
        })
    ));
    assert!(harness.messenger.audios().await.is_empty());
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_slow_search_times_out() {
    let harness = TestHarness::with_config(short_timeouts()).with_believer().await;
    harness
        .extractor
        .set_search_delay(Duration::from_secs(3))
        .await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert!(matches!(
        report.outcome,
        Err(PipelineError::Timeout {
            stage: Stage::Search,
            ..
        })
    ));
    assert_eq!(harness.extractor.download_count().await, 0);
}

#[tokio::test]
async fn test_slow_upload_times_out_and_is_cleaned() {
    let harness = TestHarness::with_config(short_timeouts()).with_believer().await;
    harness.messenger.set_audio_delay(Duration::from_secs(3)).await;

    let report = harness.orchestrator.run(CHAT, "believer").await;

    assert!(matches!(
        report.outcome,
        Err(PipelineError::Timeout {
            stage: Stage::Delivery,
            timeout_secs: 1
        })
    ));
    assert!(harness
        .messenger
        .last_text()
        .await
        .unwrap()
        .contains("envio"));
    assert_eq!(harness.leftover_entries(), 0);
}

#[tokio::test]
async fn test_cancelled_job_leaves_no_artifacts() {
    let harness = TestHarness::new().with_believer().await;
    harness
        .extractor
        .set_download_delay(Duration::from_secs(30))
        .await;

    let cancelled = tokio::time::timeout(
        Duration::from_millis(300),
        harness.orchestrator.run(CHAT, "believer"),
    )
    .await;

    assert!(cancelled.is_err(), "job should still be downloading");
    assert_eq!(harness.extractor.download_count().await, 1);
    assert_eq!(harness.leftover_entries(), 0);
}
