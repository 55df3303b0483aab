//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of every collaborator trait,
//! so the pipeline and the assistant can be exercised end to end without
//! yt-dlp, ffmpeg, Telegram or a model endpoint.
//!
//! Mocks are cheap to clone and clones share state: hand one clone to the
//! code under test and keep another for assertions.
//!
//! # Example
//!
//! ```rust,ignore
//! use melodia_core::testing::{fixtures, MockConverter, MockExtractor, MockMessenger};
//!
//! let extractor = MockExtractor::new();
//! extractor.set_results(vec![fixtures::search_result("Believer", "ImagineDragonsVEVO", 204)]).await;
//!
//! let messenger = Arc::new(MockMessenger::new());
//! let orchestrator = Orchestrator::new(config, extractor.clone(), MockConverter::new(), messenger.clone());
//! ```

mod mock_converter;
mod mock_extractor;
mod mock_llm;
mod mock_messenger;

pub use mock_converter::{MockConverter, RecordedConversion};
pub use mock_extractor::{MockExtractor, RecordedDownload, RecordedSearch};
pub use mock_llm::MockLlmClient;
pub use mock_messenger::{MessengerEvent, MockMessenger};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::extractor::{MediaStream, SearchResult};

    /// Create a stream with the given codecs and average bitrate.
    pub fn stream(format_id: &str, ext: &str, acodec: &str, vcodec: &str, abr: Option<f64>) -> MediaStream {
        MediaStream {
            format_id: format_id.to_string(),
            ext: ext.to_string(),
            acodec: Some(acodec.to_string()),
            vcodec: Some(vcodec.to_string()),
            abr,
            filesize: None,
        }
    }

    /// The stream list of a typical music video: one muxed, two audio-only
    /// opus, one audio-only m4a. The best audio-only stream is "251".
    pub fn youtube_streams() -> Vec<MediaStream> {
        vec![
            stream("18", "mp4", "mp4a.40.2", "avc1.42001E", Some(96.0)),
            stream("249", "webm", "opus", "none", Some(50.0)),
            stream("140", "m4a", "mp4a.40.2", "none", Some(129.5)),
            stream("251", "webm", "opus", "none", Some(160.0)),
        ]
    }

    /// Create a search result with reasonable defaults.
    pub fn search_result(title: &str, uploader: &str, duration_secs: u32) -> SearchResult {
        let id = format!("{:011x}", title.len() * 7919 + duration_secs as usize);
        SearchResult {
            webpage_url: format!("https://www.youtube.com/watch?v={id}"),
            id,
            title: title.to_string(),
            uploader: Some(uploader.to_string()),
            duration_secs: Some(duration_secs),
            streams: youtube_streams(),
        }
    }

    /// A result whose streams all carry video.
    pub fn video_only_result(title: &str) -> SearchResult {
        SearchResult {
            streams: vec![
                stream("18", "mp4", "mp4a.40.2", "avc1.42001E", Some(96.0)),
                stream("137", "mp4", "none", "avc1.640028", None),
            ],
            ..search_result(title, "Some Channel", 60)
        }
    }
}
