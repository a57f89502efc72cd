// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the replay directory and the upload API

pub mod scan;
pub mod traced;
pub mod upload;

pub use scan::{FsScanner, ScanAdapter, ScanError};
pub use traced::{TracedScanAdapter, TracedUploadAdapter};
pub use upload::{interpret_response, SlackUploader, UploadAdapter, UploadError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use scan::FakeScanAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use upload::{FakeUploadAdapter, UploadCall};
