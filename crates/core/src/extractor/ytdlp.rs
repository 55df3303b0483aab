//! yt-dlp based extractor implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::OnceLock;
use tokio::process::Command;

use super::config::ExtractorConfig;
use super::error::ExtractorError;
use super::traits::MediaExtractor;
use super::types::{DownloadRequest, MediaStream, SearchResult};

/// Markers yt-dlp prints for media that exists but cannot be fetched.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "video unavailable",
    "this video is unavailable",
    "private video",
    "has been removed",
    "no longer available",
    "not available in your country",
    "blocked it in your country",
    "members-only",
    "sign in to confirm your age",
    "this live event will begin",
];

/// Markers for page or response layouts yt-dlp failed to understand.
const FORMAT_MARKERS: &[&str] = &[
    "unable to extract",
    "failed to parse json",
    "unable to download api page",
    "please report this issue",
];

/// yt-dlp based extractor implementation.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    duration: Option<f64>,
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
    entries: Option<Vec<Option<RawInfo>>>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    acodec: Option<String>,
    vcodec: Option<String>,
    abr: Option<f64>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
}

impl From<RawFormat> for MediaStream {
    fn from(raw: RawFormat) -> Self {
        Self {
            format_id: raw.format_id,
            ext: raw.ext,
            acodec: raw.acodec,
            vcodec: raw.vcodec,
            abr: raw.abr,
            filesize: raw.filesize.or(raw.filesize_approx),
        }
    }
}

impl RawInfo {
    fn into_result(self) -> Option<SearchResult> {
        let id = self.id?;
        let webpage_url = self
            .webpage_url
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", id));

        Some(SearchResult {
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            uploader: self.uploader.or(self.channel),
            duration_secs: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u32),
            webpage_url,
            streams: self.formats.into_iter().map(MediaStream::from).collect(),
            id,
        })
    }
}

impl YtDlpExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Arguments shared by every invocation.
    fn common_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--no-warnings".into(), "--no-playlist".into()];

        if let Some(ref cookies) = self.config.cookies_path {
            args.push("--cookies".into());
            args.push(cookies.clone().into_os_string());
        }

        args.extend(self.config.extra_args.iter().map(OsString::from));
        args
    }

    fn build_search_args(&self, query: &str, limit: u32) -> Vec<OsString> {
        let mut args = self.common_args();
        args.extend([
            "--dump-single-json".into(),
            "--skip-download".into(),
            format!("ytsearch{}:{}", limit.max(1), query).into(),
        ]);
        args
    }

    fn build_download_args(&self, request: &DownloadRequest) -> Vec<OsString> {
        let template = request
            .output_dir
            .join(format!("{}.%(ext)s", request.file_stem));

        let mut args = self.common_args();
        args.extend([
            "--no-progress".into(),
            "-f".into(),
            request.format_id.clone().into(),
            "-o".into(),
            template.into_os_string(),
            "--print".into(),
            "after_move:filepath".into(),
            "--no-simulate".into(),
            request.source_url.clone().into(),
        ]);
        args
    }

    /// Parses `--dump-single-json` output of a search into ranked results.
    fn parse_search_output(json: &str) -> Result<Vec<SearchResult>, ExtractorError> {
        let info: RawInfo = serde_json::from_str(json)
            .map_err(|e| ExtractorError::format(format!("invalid yt-dlp JSON: {}", e)))?;

        match info.entries {
            Some(entries) => Ok(entries
                .into_iter()
                .flatten()
                .filter_map(RawInfo::into_result)
                .collect()),
            None => Ok(info.into_result().into_iter().collect()),
        }
    }

    /// Maps yt-dlp's stderr onto an error category.
    fn classify_failure(code: Option<i32>, stderr: &str) -> ExtractorError {
        static ERROR_LINE: OnceLock<Option<Regex>> = OnceLock::new();
        let error_line = ERROR_LINE
            .get_or_init(|| Regex::new(r"(?m)^ERROR:\s*(?:\[[^\]]+\]\s*)?(?:[\w-]+:\s+)?(.+)$").ok());

        let reason = error_line
            .as_ref()
            .and_then(|re| re.captures(stderr))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| stderr.trim().to_string());

        let lowered = stderr.to_lowercase();
        if UNAVAILABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
            ExtractorError::unavailable(reason)
        } else if FORMAT_MARKERS.iter().any(|m| lowered.contains(m)) {
            ExtractorError::format(reason)
        } else {
            ExtractorError::CommandFailed {
                code,
                stderr: reason,
            }
        }
    }

    /// Locates `<stem>.<ext>` in `dir`, ignoring partial downloads.
    async fn find_artifact(dir: &Path, stem: &str) -> Result<Option<PathBuf>, ExtractorError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches_stem = path.file_stem().and_then(|s| s.to_str()) == Some(stem);
            let is_partial = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e, "part" | "ytdl"));
            if matches_stem && !is_partial && path.is_file() {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Output, ExtractorError> {
        tracing::debug!(?args, "Spawning yt-dlp");

        let output = Command::new(&self.config.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::BinaryNotFound {
                        path: self.config.ytdlp_path.clone(),
                    }
                } else {
                    ExtractorError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_failure(output.status.code(), &stderr));
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, ExtractorError> {
        let output = self.run(self.build_search_args(query, limit)).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let results = Self::parse_search_output(&stdout)?;
        tracing::debug!(query, count = results.len(), "Search finished");
        Ok(results)
    }

    async fn download(&self, request: DownloadRequest) -> Result<PathBuf, ExtractorError> {
        let output = self.run(self.build_download_args(&request)).await?;

        let printed = String::from_utf8_lossy(&output.stdout)
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from);

        if let Some(path) = printed.filter(|p| p.is_file()) {
            return Ok(path);
        }

        tracing::debug!(dir = %request.output_dir.display(), "Printed path missing, scanning job directory");
        Self::find_artifact(&request.output_dir, &request.file_stem)
            .await?
            .ok_or(ExtractorError::OutputMissing {
                dir: request.output_dir,
            })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        let output = self.run(vec!["--version".into()]).await?;
        tracing::info!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "yt-dlp available"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SEARCH_JSON: &str = r#"{
        "_type": "playlist",
        "id": "Imagine Dragons - Believer",
        "entries": [
            {
                "id": "7wtfhZwyrcc",
                "title": "Imagine Dragons - Believer (Official Music Video)",
                "uploader": "ImagineDragonsVEVO",
                "duration": 217.0,
                "webpage_url": "https://www.youtube.com/watch?v=7wtfhZwyrcc",
                "formats": [
                    { "format_id": "251", "ext": "webm", "acodec": "opus", "vcodec": "none", "abr": 135.2, "filesize": 3600000 },
                    { "format_id": "18", "ext": "mp4", "acodec": "mp4a.40.2", "vcodec": "avc1.42001E", "filesize_approx": 9000000 }
                ]
            },
            null
        ]
    }"#;

    #[test]
    fn test_parse_search_output_playlist() {
        let results = YtDlpExtractor::parse_search_output(SEARCH_JSON).unwrap();
        assert_eq!(results.len(), 1);

        let first = &results[0];
        assert_eq!(first.id, "7wtfhZwyrcc");
        assert_eq!(first.title, "Imagine Dragons - Believer (Official Music Video)");
        assert_eq!(first.uploader.as_deref(), Some("ImagineDragonsVEVO"));
        assert_eq!(first.duration_secs, Some(217));
        assert_eq!(first.streams.len(), 2);
        assert!(first.streams[0].is_audio_only());
        assert_eq!(first.streams[1].filesize, Some(9_000_000));
    }

    #[test]
    fn test_parse_search_output_empty_entries() {
        let json = r#"{ "_type": "playlist", "id": "nothing", "entries": [] }"#;
        let results = YtDlpExtractor::parse_search_output(json).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_search_output_single_video() {
        let json = r#"{ "id": "abc", "title": "Song", "channel": "Band", "duration": 59.6 }"#;
        let results = YtDlpExtractor::parse_search_output(json).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uploader.as_deref(), Some("Band"));
        assert_eq!(results[0].duration_secs, Some(60));
        assert_eq!(results[0].webpage_url, "https://www.youtube.com/watch?v=abc");
        assert!(results[0].streams.is_empty());
    }

    #[test]
    fn test_parse_search_output_garbage() {
        let result = YtDlpExtractor::parse_search_output("<html>");
        assert!(matches!(result, Err(ExtractorError::ExtractionFormat { .. })));
    }

    #[test]
    fn test_classify_unavailable() {
        let stderr = "ERROR: [youtube] dQw4w9WgXcQ: Video unavailable. This video is not available in your country\n";
        match YtDlpExtractor::classify_failure(Some(1), stderr) {
            ExtractorError::MediaUnavailable { reason } => {
                assert!(reason.starts_with("Video unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_extraction_format() {
        let stderr = "ERROR: [youtube] abc: Unable to extract uploader id; please report this issue\n";
        assert!(matches!(
            YtDlpExtractor::classify_failure(Some(1), stderr),
            ExtractorError::ExtractionFormat { .. }
        ));
    }

    #[test]
    fn test_classify_other_failure() {
        let stderr = "ERROR: Requested format is not available\n";
        match YtDlpExtractor::classify_failure(Some(1), stderr) {
            ExtractorError::CommandFailed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "Requested format is not available");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_search_args() {
        let extractor = YtDlpExtractor::new(ExtractorConfig {
            cookies_path: Some(PathBuf::from("/etc/cookies.txt")),
            extra_args: vec![],
            ..Default::default()
        });
        let args = extractor.build_search_args("Imagine Dragons - Believer", 1);

        assert!(args.contains(&OsString::from("--dump-single-json")));
        assert!(args.contains(&OsString::from("--cookies")));
        assert_eq!(
            args.last(),
            Some(&OsString::from("ytsearch1:Imagine Dragons - Believer"))
        );
    }

    #[test]
    fn test_build_download_args() {
        let extractor = YtDlpExtractor::new(ExtractorConfig::default());
        let request = DownloadRequest {
            source_url: "https://www.youtube.com/watch?v=abc".to_string(),
            format_id: "251".to_string(),
            output_dir: PathBuf::from("/tmp/jobs/1"),
            file_stem: "Believer".to_string(),
        };
        let args = extractor.build_download_args(&request);

        assert!(args.contains(&OsString::from("251")));
        assert!(args.contains(&OsString::from("/tmp/jobs/1/Believer.%(ext)s")));
        assert!(args.contains(&OsString::from("after_move:filepath")));
        assert_eq!(
            args.last(),
            Some(&OsString::from("https://www.youtube.com/watch?v=abc"))
        );
    }

    #[tokio::test]
    async fn test_find_artifact_skips_partial_files() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("Believer.webm.part"), b"x").await.unwrap();
        tokio::fs::write(dir.path().join("Other.webm"), b"x").await.unwrap();

        let found = YtDlpExtractor::find_artifact(dir.path(), "Believer").await.unwrap();
        assert!(found.is_none());

        tokio::fs::write(dir.path().join("Believer.webm"), b"x").await.unwrap();
        let found = YtDlpExtractor::find_artifact(dir.path(), "Believer").await.unwrap();
        assert_eq!(found, Some(dir.path().join("Believer.webm")));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let extractor = YtDlpExtractor::new(ExtractorConfig {
            ytdlp_path: PathBuf::from("/nonexistent/yt-dlp"),
            ..Default::default()
        });
        let result = extractor.search("anything", 1).await;
        assert!(matches!(result, Err(ExtractorError::BinaryNotFound { .. })));
    }
}
