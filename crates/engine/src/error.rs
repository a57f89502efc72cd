// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the delivery loop

use courier_adapters::{ScanError, UploadError};
use courier_core::ReplayId;
use courier_storage::LedgerError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop the delivery loop
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("upload of {replay} failed: {source}")]
    Upload {
        replay: ReplayId,
        source: UploadError,
    },
    #[error("replay path has no usable file name: {}", .0.display())]
    InvalidReplayName(PathBuf),
}
