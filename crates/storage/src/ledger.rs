// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The durable ledger: which replays have been uploaded

use crate::state::LedgerState;
use crate::wal::{Wal, WalError};
use courier_core::{ReplayId, ReplayRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to initialize ledger at {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: WalError,
    },
    #[error("failed to check ledger for {replay}: {reason}")]
    Query { replay: ReplayId, reason: String },
    #[error("failed to record that {replay} was uploaded: {source}")]
    Write {
        replay: ReplayId,
        #[source]
        source: WalError,
    },
}

/// Set of replays whose upload has been confirmed.
///
/// Write-once per key: there is no update or delete. Errors are never
/// reported as "present" or "absent".
pub trait Ledger: Send {
    /// Whether the replay has been recorded
    fn contains(&self, replay: &ReplayId) -> Result<bool, LedgerError>;

    /// Durably record the replay. Returns false if it was already recorded,
    /// in which case nothing is written.
    fn record(&mut self, replay: &ReplayId) -> Result<bool, LedgerError>;

    /// Number of distinct recorded replays
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ledger backed by an append-only file
pub struct FileLedger {
    path: PathBuf,
    wal: Wal,
    state: LedgerState,
    /// Set after a failed append: memory may no longer match disk
    stale: bool,
}

impl FileLedger {
    /// Open the ledger at `path`, creating it if absent.
    ///
    /// Existing entries are loaded; opening an existing ledger changes nothing
    /// except cutting off a torn final entry.
    pub fn initialize(path: &Path) -> Result<Self, LedgerError> {
        let (wal, records) = Wal::open(path).map_err(|source| LedgerError::Init {
            path: path.to_path_buf(),
            source,
        })?;
        let state = LedgerState::from_records(records);

        tracing::debug!(path = %path.display(), replays = state.len(), "ledger loaded");

        Ok(Self {
            path: path.to_path_buf(),
            wal,
            state,
            stale: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sequence number of the last entry on disk
    pub fn sequence(&self) -> u64 {
        self.wal.sequence()
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Reload from disk after a failed write
    pub fn resync(&mut self) -> Result<(), WalError> {
        let (wal, records) = Wal::open(&self.path)?;
        self.wal = wal;
        self.state = LedgerState::from_records(records);
        self.stale = false;
        tracing::info!(path = %self.path.display(), replays = self.state.len(), "ledger resynced");
        Ok(())
    }
}

impl Ledger for FileLedger {
    fn contains(&self, replay: &ReplayId) -> Result<bool, LedgerError> {
        if self.stale {
            return Err(LedgerError::Query {
                replay: replay.clone(),
                reason: "ledger is out of step with disk after a failed write".to_string(),
            });
        }
        Ok(self.state.contains(replay))
    }

    fn record(&mut self, replay: &ReplayId) -> Result<bool, LedgerError> {
        if self.stale {
            self.resync().map_err(|source| LedgerError::Write {
                replay: replay.clone(),
                source,
            })?;
        }
        if self.state.contains(replay) {
            return Ok(false);
        }

        let record = ReplayRecord::new(replay.clone());
        if let Err(source) = self.wal.append(&record) {
            self.stale = true;
            return Err(LedgerError::Write {
                replay: replay.clone(),
                source,
            });
        }
        self.state.apply(&record);
        Ok(true)
    }

    fn len(&self) -> usize {
        self.state.len()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
