// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! courier-core: shared types for the replay courier
//!
//! This crate provides:
//! - Replay identifiers and the ledger record type
//! - Ephemeral upload attempt bookkeeping
//! - Configuration loading and validation

pub mod config;
pub mod replay;

pub use config::{AuthToken, Config, ConfigError, FailurePolicy, DEFAULT_API_URL};
pub use replay::{AttemptOutcome, ReplayId, ReplayRecord, UploadAttempt};
