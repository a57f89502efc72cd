// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay directory scanning

mod fs;

pub use fs::FsScanner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeScanAdapter;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from scanning
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read replay directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter that lists candidate replay files
#[async_trait]
pub trait ScanAdapter: Clone + Send + Sync + 'static {
    /// List replay files in `dir`. Each call is a fresh listing.
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError>;
}
