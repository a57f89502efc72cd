// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upload adapters

mod slack;

pub use slack::{interpret_response, SlackUploader};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeUploadAdapter, UploadCall};

use async_trait::async_trait;
use courier_core::ReplayId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from upload operations
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read replay {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
    #[error("upload rejected by API: {0}")]
    Rejected(String),
}

/// Adapter that delivers one replay file to the destination
#[async_trait]
pub trait UploadAdapter: Clone + Send + Sync + 'static {
    /// Upload the file at `path` under the name `replay`.
    ///
    /// Makes a single attempt; retrying is the caller's business.
    async fn upload(&self, path: &Path, replay: &ReplayId) -> Result<(), UploadError>;
}
