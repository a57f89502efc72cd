// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay identity and upload bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a replay: the file's base name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayId(String);

impl ReplayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier from a replay path.
    ///
    /// Returns `None` when the path has no final component. Names that are not
    /// UTF-8 are converted lossily, so every listed file gets an identifier.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .filter(|name| !name.is_empty())
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ReplayId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReplayId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ReplayId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Durable proof that a replay was uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub replay: ReplayId,
    pub recorded_at: DateTime<Utc>,
}

impl ReplayRecord {
    pub fn new(replay: ReplayId) -> Self {
        Self {
            replay,
            recorded_at: Utc::now(),
        }
    }
}

/// Result of a single upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Pending,
    Succeeded,
    Failed { reason: String },
}

/// One call to the upload client. Never persisted.
#[derive(Debug, Clone)]
pub struct UploadAttempt {
    pub replay: ReplayId,
    pub path: PathBuf,
    /// 1-based attempt number within the current cycle
    pub attempt: u32,
    pub started_at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
}

impl UploadAttempt {
    pub fn start(replay: ReplayId, path: impl Into<PathBuf>, attempt: u32) -> Self {
        Self {
            replay,
            path: path.into(),
            attempt,
            started_at: Utc::now(),
            outcome: AttemptOutcome::Pending,
        }
    }

    pub fn succeed(mut self) -> Self {
        self.outcome = AttemptOutcome::Succeeded;
        self
    }

    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.outcome = AttemptOutcome::Failed {
            reason: reason.into(),
        };
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }

    /// Failure reason, if the attempt failed
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
