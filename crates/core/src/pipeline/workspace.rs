//! Per-job scratch directory.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::JobId;

/// A directory owned by exactly one job, holding its temporary artifacts.
///
/// [`cleanup`](Self::cleanup) removes everything. If the workspace is dropped
/// without it (the job's task was cancelled), `Drop` removes the directory
/// synchronously.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: PathBuf,
    artifacts: Vec<PathBuf>,
    cleaned: bool,
}

impl JobWorkspace {
    /// Creates `<root>/<job_id>/`.
    pub async fn create(root: &Path, job_id: &JobId) -> io::Result<Self> {
        let dir = root.join(job_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "Created job workspace");

        Ok(Self {
            dir,
            artifacts: Vec::new(),
            cleaned: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `<stem>.<ext>` inside the workspace.
    pub fn path_for(&self, stem: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{ext}"))
    }

    /// Records an artifact for removal.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }

    /// Removes every registered artifact and then the directory itself.
    ///
    /// Failures are logged at debug level and otherwise ignored.
    pub async fn cleanup(mut self) {
        for path in &self.artifacts {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Removed artifact"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => debug!(path = %path.display(), error = %e, "Failed to remove artifact"),
            }
        }

        // Also catches files the extractor left behind (.part, .ytdl).
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(dir = %self.dir.display(), error = %e, "Failed to remove job workspace");
            }
        }

        self.cleaned = true;
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        // Only reached when the job future is cancelled before `cleanup`.
        if !self.cleaned {
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(dir = %self.dir.display(), error = %e, "Failed to remove abandoned workspace");
                }
            }
        }
    }
}
