// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake scan adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ScanAdapter, ScanError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeScanState {
    files: Vec<PathBuf>,
    fail: bool,
    scans: Vec<PathBuf>,
}

/// Fake scanner returning a fixed listing
#[derive(Clone, Default)]
pub struct FakeScanAdapter {
    inner: Arc<Mutex<FakeScanState>>,
}

impl FakeScanAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner that lists these files
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let scanner = Self::new();
        scanner.set_files(files);
        scanner
    }

    /// Replace the listing
    pub fn set_files<I, P>(&self, files: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).files =
            files.into_iter().map(Into::into).collect();
    }

    /// Make every scan fail as if the directory were unreadable
    pub fn fail(&self, fail: bool) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).fail = fail;
    }

    /// Directories scanned so far
    pub fn scans(&self) -> Vec<PathBuf> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .scans
            .clone()
    }
}

#[async_trait]
impl ScanAdapter for FakeScanAdapter {
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.scans.push(dir.to_path_buf());
        if inner.fail {
            return Err(ScanError::ReadDir {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "injected"),
            });
        }
        Ok(inner.files.clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
