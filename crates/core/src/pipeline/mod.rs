//! The download-convert-deliver-cleanup pipeline behind `/musicas`.
//!
//! A job runs strictly in sequence:
//! - Search: resolve the query to ranked results (first one wins)
//! - Selection: pick the best audio-only stream
//! - Download: fetch it into a workspace owned by the job
//! - Transcode: convert to MP3 and check the output carries audio
//! - Delivery: upload the file with the result's metadata
//!
//! Every stage runs under its own deadline, and the job's workspace is removed
//! before [`Orchestrator::run`] returns, whatever the outcome.
//!
//! # Example
//!
//! ```ignore
//! use melodia_core::pipeline::{Orchestrator, PipelineConfig};
//!
//! let orchestrator = Orchestrator::new(PipelineConfig::default(), extractor, converter, messenger);
//! let report = orchestrator.run(chat, "Imagine Dragons - Believer").await;
//! ```

mod config;
mod error;
mod messages;
mod orchestrator;
mod select;
mod types;
mod workspace;

pub use config::{PipelineConfig, StageTimeouts};
pub use error::{ErrorKind, PipelineError};
pub use messages::{error_text, format_duration};
pub use orchestrator::Orchestrator;
pub use select::{sanitize_file_stem, select_audio_stream, MAX_STEM_CHARS};
pub use types::{Job, JobId, JobReport, Stage, TrackDescriptor, UNKNOWN};
pub use workspace::JobWorkspace;
