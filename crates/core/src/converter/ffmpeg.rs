//! ffmpeg/ffprobe subprocess converter.

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, MediaInfo, Mp3Encoding};

/// Number of trailing stderr lines kept in a conversion failure.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Deserialize)]
struct ProbeReport {
    format: ProbeFormat,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: String,
    codec_name: Option<String>,
    bit_rate: Option<String>,
}

/// Transcodes with the `ffmpeg` binary and inspects files with `ffprobe`.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Arguments for one audio-only MP3 transcode.
    fn build_args(&self, job: &ConversionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-nostdin".into(),
            "-y".into(),
            "-loglevel".into(),
            self.config.log_level.clone().into(),
            "-i".into(),
            job.input_path.clone().into(),
            // no video, no cover art
            "-vn".into(),
            "-c:a".into(),
            Mp3Encoding::CODEC.into(),
            "-b:a".into(),
            format!("{}k", job.encoding.bitrate_kbps).into(),
            "-id3v2_version".into(),
            Mp3Encoding::ID3_VERSION.into(),
        ];

        if let Some(metadata) = &job.metadata {
            args.extend(metadata.to_ffmpeg_args().into_iter().map(OsString::from));
        }
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args.push(job.output_path.clone().into());
        args
    }

    fn parse_probe_output(path: &Path, output: &str) -> Result<MediaInfo, ConverterError> {
        let report: ProbeReport =
            serde_json::from_str(output).map_err(|e| ConverterError::ParseError {
                reason: format!("invalid ffprobe JSON: {}", e),
            })?;

        let audio = report.streams.iter().find(|s| s.codec_type == "audio");

        Ok(MediaInfo {
            path: path.to_path_buf(),
            size_bytes: parse_number(report.format.size.as_deref()).unwrap_or(0),
            duration_secs: parse_number(report.format.duration.as_deref()).unwrap_or(0.0),
            audio_codec: audio.and_then(|s| s.codec_name.clone()),
            audio_bitrate_kbps: audio
                .and_then(|s| parse_number::<u32>(s.bit_rate.as_deref()))
                .map(|bps| bps / 1000),
        })
    }

    /// Maps a spawn failure, treating a missing executable as a setup error.
    fn spawn_error(
        e: std::io::Error,
        not_found: impl FnOnce() -> ConverterError,
    ) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found()
        } else {
            ConverterError::Io(e)
        }
    }

    fn ffmpeg_missing(&self) -> ConverterError {
        ConverterError::FfmpegNotFound {
            path: self.config.ffmpeg_path.clone(),
        }
    }

    fn ffprobe_missing(&self) -> ConverterError {
        ConverterError::FfprobeNotFound {
            path: self.config.ffprobe_path.clone(),
        }
    }

    async fn check_binary(
        path: &Path,
        not_found: impl FnOnce() -> ConverterError,
    ) -> Result<(), ConverterError> {
        Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map(|_| ())
            .map_err(|e| Self::spawn_error(e, not_found))
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Last lines of ffmpeg's stderr, or `None` when it printed nothing.
fn stderr_tail(stderr: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join("\n");
    (!tail.is_empty()).then_some(tail)
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Self::spawn_error(e, || self.ffprobe_missing()))?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe exited with code {:?}",
                output.status.code()
            )));
        }

        Self::parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path,
            });
        }

        let args = self.build_args(&job);
        tracing::debug!(job_id = %job.job_id, ?args, "Spawning ffmpeg");

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::spawn_error(e, || self.ffmpeg_missing()))?;

        // Dropping the wait future on timeout kills the child.
        let limit = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ConverterError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })??;

        if !output.status.success() {
            return Err(ConverterError::conversion_failed(
                format!("ffmpeg exited with code {:?}", output.status.code()),
                stderr_tail(&output.stderr),
            ));
        }

        let size_bytes = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("output file was not created", None))?
            .len();

        Ok(ConversionResult {
            output_path: job.output_path,
            size_bytes,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Self::check_binary(&self.config.ffmpeg_path, || self.ffmpeg_missing()).await?;
        Self::check_binary(&self.config.ffprobe_path, || self.ffprobe_missing()).await
    }
}
