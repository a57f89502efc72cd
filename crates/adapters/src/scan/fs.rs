// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem scanner matching replays by extension

use super::{ScanAdapter, ScanError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Lists regular files whose extension matches, sorted by path
#[derive(Clone, Debug)]
pub struct FsScanner {
    extension: String,
}

impl FsScanner {
    /// `extension` is matched case-sensitively, without the dot
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

impl Default for FsScanner {
    fn default() -> Self {
        Self::new("gif")
    }
}

#[async_trait]
impl ScanAdapter for FsScanner {
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let read_err = |source: std::io::Error| ScanError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
        let mut replays = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            if !self.matches(&path) {
                continue;
            }

            // Follows symlinks; a dangling one is skipped until its target appears
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => replays.push(path),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                }
            }
        }

        replays.sort();
        Ok(replays)
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
