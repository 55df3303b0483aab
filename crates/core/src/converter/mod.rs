//! Converter module for transcoding downloaded media to compressed audio.
//!
//! This module provides the `Converter` trait and an FFmpeg-backed
//! implementation.
//!
//! # Example
//!
//! ```ignore
//! use melodia_core::converter::{
//!     ConversionJob, Converter, ConverterConfig, EmbeddedMetadata, FfmpegConverter, Mp3Encoding,
//! };
//!
//! let converter = FfmpegConverter::new(ConverterConfig::default());
//! converter.validate().await?;
//!
//! let job = ConversionJob {
//!     job_id: "job-1".to_string(),
//!     input_path: PathBuf::from("/tmp/jobs/1/Believer.webm"),
//!     output_path: PathBuf::from("/tmp/jobs/1/Believer.mp3"),
//!     encoding: Mp3Encoding::new(192),
//!     metadata: Some(EmbeddedMetadata {
//!         title: Some("Believer".to_string()),
//!         artist: Some("Imagine Dragons".to_string()),
//!         comment: None,
//!     }),
//! };
//!
//! let result = converter.convert(job).await?;
//! let info = converter.probe(&result.output_path).await?;
//! println!("{} seconds of {:?}", info.duration_secs, info.audio_codec);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{ConversionJob, ConversionResult, EmbeddedMetadata, MediaInfo, Mp3Encoding};
