//! Artifact store: generated archives and their retention.
//!
//! Artifacts are the per-request downloadable archives, kept in one flat
//! directory as `<uuid>.zip`. Unlike cached tiles they are transient: a sweep
//! pass deletes anything older than the retention window. The sweep runs on
//! every incoming generation request rather than a background timer, so a
//! quiet server simply keeps its last few artifacts around.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::FilesystemError;

/// Default artifact retention window: 24 hours.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Directory of generated archives with time-based eviction.
pub struct ArtifactStore {
    root: PathBuf,
    retention: Duration,
}

impl ArtifactStore {
    /// Create a store rooted at `root` with the default 24 h retention.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    /// Create a store with a custom retention window.
    pub fn with_retention(root: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            root: root.into(),
            retention,
        }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configured retention window.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Reserve the canonical destination path for a request's archive,
    /// creating the root directory if absent.
    ///
    /// The file itself is written by the archive builder; deposit only hands
    /// out the path.
    pub async fn deposit(&self, request_id: Uuid) -> Result<PathBuf, FilesystemError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| FilesystemError::new(&self.root, &e))?;
        Ok(self.root.join(format!("{request_id}.zip")))
    }

    /// Path of a finished artifact, if it exists.
    ///
    /// Serving the file is delegated to a plain file server; this is just the
    /// static path lookup backing it.
    pub async fn lookup(&self, request_id: Uuid) -> Option<PathBuf> {
        let path = self.root.join(format!("{request_id}.zip"));
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    /// Delete artifacts older than the retention window. Returns the number
    /// of files removed.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(SystemTime::now()).await
    }

    /// Sweep relative to an explicit `now` (tests inject a shifted clock).
    ///
    /// Per-entry failures are logged and swallowed: a file vanishing between
    /// listing and deletion is a tolerated race, and one bad entry never
    /// stops the sweep.
    pub async fn sweep_at(&self, now: SystemTime) -> usize {
        let Some(cutoff) = now.checked_sub(self.retention) else {
            return 0;
        };

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            // Nothing generated yet; nothing to sweep.
            Err(_) => return 0,
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "sweep: listing failed");
                    break;
                }
            };

            let path = entry.path();
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "sweep: cannot stat entry");
                    continue;
                }
            };

            if modified >= cutoff {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    info!(path = %path.display(), "sweep: removed expired artifact");
                    removed += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "sweep: removal failed");
                }
            }
        }

        removed
    }
}

// =============================================================================
// Tests
// =============================================================================
