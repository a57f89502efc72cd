// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake upload adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{UploadAdapter, UploadError};
use async_trait::async_trait;
use courier_core::ReplayId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded upload call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    pub path: PathBuf,
    pub replay: ReplayId,
}

/// How many more times a replay should fail
#[derive(Debug, Clone, Copy)]
enum Failures {
    Always,
    Times(u32),
}

#[derive(Default)]
struct FakeUploadState {
    calls: Vec<UploadCall>,
    failures: HashMap<ReplayId, Failures>,
}

/// Fake upload adapter that records calls and fails on request
#[derive(Clone, Default)]
pub struct FakeUploadAdapter {
    inner: Arc<Mutex<FakeUploadState>>,
}

impl FakeUploadAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload of `replay` fails
    pub fn fail_always(&self, replay: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .insert(ReplayId::new(replay), Failures::Always);
    }

    /// The next `times` uploads of `replay` fail, later ones succeed
    pub fn fail_times(&self, replay: &str, times: u32) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .insert(ReplayId::new(replay), Failures::Times(times));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<UploadCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Replays passed to `upload`, in call order
    pub fn uploaded(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.replay.to_string())
            .collect()
    }
}

#[async_trait]
impl UploadAdapter for FakeUploadAdapter {
    async fn upload(&self, path: &Path, replay: &ReplayId) -> Result<(), UploadError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(UploadCall {
            path: path.to_path_buf(),
            replay: replay.clone(),
        });

        let fail = match inner.failures.get_mut(replay) {
            Some(Failures::Always) => true,
            Some(Failures::Times(0)) | None => false,
            Some(Failures::Times(n)) => {
                *n -= 1;
                true
            }
        };

        if fail {
            return Err(UploadError::Rejected("fake_failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
