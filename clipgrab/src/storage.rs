//! The output directory.
//!
//! Downloads land in a single flat directory that doubles as scratch space
//! and as the only persisted artifact store. There is no index; whatever is
//! in the directory is the state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::Result;
use crate::utils::fs;

/// Existence and writability of the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirHealth {
    pub exists: bool,
    pub writable: bool,
}

/// Cheaply cloneable handle to the output directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: Arc<PathBuf>,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<()> {
        fs::ensure_dir_all_with_op("creating output directory", &self.path).await
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::metadata(self.path.as_path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Probe writability by creating (and dropping) a temporary file.
    ///
    /// Permission bits alone do not account for read-only mounts or ACLs.
    pub async fn is_writable(&self) -> bool {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || tempfile::NamedTempFile::new_in(path.as_path()).is_ok())
            .await
            .unwrap_or(false)
    }

    pub async fn health(&self) -> DirHealth {
        let exists = self.exists().await;
        let writable = exists && self.is_writable().await;
        DirHealth { exists, writable }
    }

    /// Delete regular files directly inside the directory.
    ///
    /// Subdirectories and their contents are left alone. With `older_than`,
    /// only files whose modification time is at least that old are removed.
    /// Returns the number of files removed.
    pub async fn cleanup(&self, older_than: Option<Duration>) -> Result<usize> {
        let dir = self.path.as_path();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| fs::io_error("reading output directory", dir, e))?;

        let now = SystemTime::now();
        let mut removed = 0usize;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| fs::io_error("reading output directory", dir, e))?
        {
            let path = entry.path();
            let Ok(metadata) = tokio::fs::metadata(&path).await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            if let Some(min_age) = older_than {
                let age = metadata
                    .modified()
                    .ok()
                    .and_then(|modified| now.duration_since(modified).ok())
                    .unwrap_or_default();
                if age < min_age {
                    debug!(path = %path.display(), "Keeping recent file");
                    continue;
                }
            }

            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| fs::io_error("removing file", &path, e))?;
            removed += 1;
        }

        info!(dir = %dir.display(), count = removed, "Cleaned up output directory");
        Ok(removed)
    }
}
