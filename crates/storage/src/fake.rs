// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake ledger for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::ledger::{Ledger, LedgerError};
use crate::wal::WalError;
use courier_core::ReplayId;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Recorded ledger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Contains(ReplayId),
    Record(ReplayId),
}

#[derive(Default)]
struct FakeLedgerState {
    replays: BTreeSet<ReplayId>,
    calls: Vec<LedgerCall>,
    fail_contains: bool,
    fail_record: bool,
}

/// In-memory ledger with injectable failures.
///
/// Clones share state, so a test can keep a handle after moving one into the
/// delivery loop.
#[derive(Clone, Default)]
pub struct FakeLedger {
    inner: Arc<Mutex<FakeLedgerState>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with already-uploaded replays
    pub fn with_recorded<I, S>(replays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ledger = Self::new();
        {
            let mut inner = ledger.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.replays.extend(replays.into_iter().map(ReplayId::new));
        }
        ledger
    }

    /// Make every `contains` call fail
    pub fn fail_contains(&self, fail: bool) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).fail_contains = fail;
    }

    /// Make every `record` call fail
    pub fn fail_record(&self, fail: bool) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).fail_record = fail;
    }

    /// Recorded replays, sorted
    pub fn recorded(&self) -> Vec<ReplayId> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replays
            .iter()
            .cloned()
            .collect()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

impl Ledger for FakeLedger {
    fn contains(&self, replay: &ReplayId) -> Result<bool, LedgerError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(LedgerCall::Contains(replay.clone()));
        if inner.fail_contains {
            return Err(LedgerError::Query {
                replay: replay.clone(),
                reason: "injected query failure".to_string(),
            });
        }
        Ok(inner.replays.contains(replay))
    }

    fn record(&mut self, replay: &ReplayId) -> Result<bool, LedgerError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(LedgerCall::Record(replay.clone()));
        if inner.fail_record {
            return Err(LedgerError::Write {
                replay: replay.clone(),
                source: WalError::Io(std::io::Error::other("injected write failure")),
            });
        }
        Ok(inner.replays.insert(replay.clone()))
    }

    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replays
            .len()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
