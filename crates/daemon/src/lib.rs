// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Courier daemon: startup, ledger lock and shutdown

pub mod lifecycle;

pub use lifecycle::{load_config, lock_path_for, startup, Daemon, DaemonDelivery, LifecycleError};
