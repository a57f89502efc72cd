// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::scan::FakeScanAdapter;
use crate::upload::FakeUploadAdapter;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn replay_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"replay").unwrap();
    path
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_upload_rejects_missing_file_without_calling_inner() {
    let fake = FakeUploadAdapter::new();
    let traced = TracedUploadAdapter::new(fake.clone());

    let result = traced
        .upload(Path::new("/nonexistent/a.gif"), &ReplayId::new("a.gif"))
        .await;

    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("replay file does not exist"),
        "Expected error about missing file, got: {}",
        err
    );
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn traced_upload_rejects_directory_without_calling_inner() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("folder.gif");
    std::fs::create_dir(&folder).unwrap();
    let fake = FakeUploadAdapter::new();

    let err = TracedUploadAdapter::new(fake.clone())
        .upload(&folder, &ReplayId::new("folder.gif"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::ReadFile { ref path, .. } if path == &folder));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn traced_upload_passes_through_to_inner() {
    let dir = tempfile::tempdir().unwrap();
    let path = replay_file(dir.path(), "a.gif");
    let fake = FakeUploadAdapter::new();
    let traced = TracedUploadAdapter::new(fake.clone());

    traced.upload(&path, &ReplayId::new("a.gif")).await.unwrap();
    assert_eq!(traced.inner().uploaded(), vec!["a.gif"]);
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_upload_logs_entry_and_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = replay_file(dir.path(), "match-7.gif");

    let (logs, result) = with_tracing(move || async move {
        let traced = TracedUploadAdapter::new(FakeUploadAdapter::new());
        traced.upload(&path, &ReplayId::new("match-7.gif")).await
    });

    assert!(result.is_ok(), "upload should succeed: {:?}", result);
    assert!(
        logs.contains("upload"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("match-7.gif"),
        "Should log replay name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("uploading replay"),
        "Should log entry message. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("uploaded replay"),
        "Should log completion. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_upload_logs_failure_reason() {
    let dir = tempfile::tempdir().unwrap();
    let path = replay_file(dir.path(), "a.gif");

    let (logs, result) = with_tracing(move || async move {
        let fake = FakeUploadAdapter::new();
        fake.fail_always("a.gif");
        TracedUploadAdapter::new(fake)
            .upload(&path, &ReplayId::new("a.gif"))
            .await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("upload failed"),
        "Should log failure. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("fake_failure"),
        "Should log the API reason. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_upload_logs_precondition_failure() {
    let (logs, result) = with_tracing(|| async {
        TracedUploadAdapter::new(FakeUploadAdapter::new())
            .upload(Path::new("/nonexistent/a.gif"), &ReplayId::new("a.gif"))
            .await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("replay file missing"),
        "Should log precondition failure. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_scan_logs_candidate_count() {
    let (logs, result) = with_tracing(|| async {
        let scanner = FakeScanAdapter::with_files(["/r/a.gif", "/r/b.gif"]);
        TracedScanAdapter::new(scanner).scan(Path::new("/r")).await
    });

    assert_eq!(result.unwrap().len(), 2);
    assert!(
        logs.contains("candidates=2"),
        "Should log candidate count. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_scan_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let scanner = FakeScanAdapter::new();
        scanner.fail(true);
        TracedScanAdapter::new(scanner).scan(Path::new("/r")).await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("scan failed"),
        "Should log scan failure. Logs:\n{}",
        logs
    );
}
