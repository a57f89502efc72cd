// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::scan::{ScanAdapter, ScanError};
use crate::upload::{UploadAdapter, UploadError};
use async_trait::async_trait;
use courier_core::ReplayId;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Wrapper that adds tracing to any UploadAdapter
#[derive(Clone)]
pub struct TracedUploadAdapter<U> {
    inner: U,
}

impl<U> TracedUploadAdapter<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &U {
        &self.inner
    }
}

#[async_trait]
impl<U: UploadAdapter> UploadAdapter for TracedUploadAdapter<U> {
    async fn upload(&self, path: &Path, replay: &ReplayId) -> Result<(), UploadError> {
        let span = tracing::info_span!("upload", %replay);

        async {
            tracing::info!(path = %path.display(), "uploading replay");

            // Precondition: the replay must still be on disk
            let is_file = tokio::fs::metadata(path)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !is_file {
                tracing::error!(path = %path.display(), "replay file missing");
                return Err(UploadError::ReadFile {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "replay file does not exist",
                    ),
                });
            }

            let start = std::time::Instant::now();
            let result = self.inner.upload(path, replay).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "uploaded replay"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "upload failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ScanAdapter
#[derive(Clone)]
pub struct TracedScanAdapter<S> {
    inner: S,
}

impl<S> TracedScanAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ScanAdapter> ScanAdapter for TracedScanAdapter<S> {
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let span = tracing::debug_span!("scan", dir = %dir.display());

        async {
            let result = self.inner.scan(dir).await;
            match &result {
                Ok(replays) => tracing::debug!(candidates = replays.len(), "scanned"),
                Err(e) => tracing::error!(error = %e, "scan failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
