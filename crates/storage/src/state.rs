// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized set of uploaded replays, rebuilt from the log

use chrono::{DateTime, Utc};
use courier_core::{ReplayId, ReplayRecord};
use std::collections::HashMap;

/// Replays known to be uploaded, with when they were first recorded
#[derive(Debug, Default)]
pub struct LedgerState {
    replays: HashMap<ReplayId, DateTime<Utc>>,
}

impl LedgerState {
    /// Build state from records in log order
    pub fn from_records(records: impl IntoIterator<Item = ReplayRecord>) -> Self {
        let mut state = Self::default();
        for record in records {
            state.apply(&record);
        }
        state
    }

    /// Apply a record. Returns false if the replay was already present.
    ///
    /// The first record wins; later duplicates leave the timestamp alone.
    pub fn apply(&mut self, record: &ReplayRecord) -> bool {
        if self.replays.contains_key(&record.replay) {
            return false;
        }
        self.replays
            .insert(record.replay.clone(), record.recorded_at);
        true
    }

    pub fn contains(&self, replay: &ReplayId) -> bool {
        self.replays.contains_key(replay)
    }

    /// When the replay was first recorded
    pub fn recorded_at(&self, replay: &ReplayId) -> Option<DateTime<Utc>> {
        self.replays.get(replay).copied()
    }

    pub fn len(&self) -> usize {
        self.replays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replays.is_empty()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
