// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The delivery loop
//!
//! Each cycle lists the replay directory, drops replays the ledger already
//! holds, uploads the rest one at a time and records each success before
//! moving on. Between cycles the loop sleeps for the check interval.

use crate::error::DeliveryError;
use courier_adapters::{ScanAdapter, UploadAdapter, UploadError};
use courier_core::{Config, FailurePolicy, ReplayId, UploadAttempt};
use courier_storage::Ledger;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Delivery loop adapter dependencies
pub struct DeliveryDeps<S, U, L> {
    pub scanner: S,
    pub uploader: U,
    pub ledger: L,
}

/// Delivery loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Directory scanned each cycle
    pub replay_dir: PathBuf,
    /// Sleep between cycles
    pub interval: Duration,
    /// What to do when a replay still fails after its retries
    pub policy: FailurePolicy,
    /// Extra attempts per replay within one cycle
    pub upload_retries: u32,
    pub retry_delay: Duration,
}

impl DeliveryConfig {
    pub fn new(replay_dir: impl Into<PathBuf>) -> Self {
        Self {
            replay_dir: replay_dir.into(),
            interval: Duration::from_secs(30),
            policy: FailurePolicy::Abort,
            upload_retries: 0,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl From<&Config> for DeliveryConfig {
    fn from(config: &Config) -> Self {
        Self {
            replay_dir: config.replay_directory_path.clone(),
            interval: config.check_interval,
            policy: config.on_upload_error,
            upload_retries: config.upload_retries,
            retry_delay: config.retry_delay,
        }
    }
}

/// Outcome of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Candidates returned by the scan
    pub scanned: usize,
    pub already_recorded: Vec<ReplayId>,
    /// Uploaded and recorded this cycle, in upload order
    pub uploaded: Vec<ReplayId>,
    /// Skipped after a failed upload, with the last failure reason
    pub failed: Vec<(ReplayId, String)>,
}

impl CycleReport {
    /// True when the cycle found nothing new
    pub fn is_idle(&self) -> bool {
        self.uploaded.is_empty() && self.failed.is_empty()
    }
}

/// Single sequential worker that delivers each new replay once
pub struct DeliveryLoop<S, U, L> {
    scanner: S,
    uploader: U,
    ledger: L,
    config: DeliveryConfig,
}

impl<S, U, L> DeliveryLoop<S, U, L>
where
    S: ScanAdapter,
    U: UploadAdapter,
    L: Ledger,
{
    pub fn new(deps: DeliveryDeps<S, U, L>, config: DeliveryConfig) -> Self {
        Self {
            scanner: deps.scanner,
            uploader: deps.uploader,
            ledger: deps.ledger,
            config,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Run one scan, filter, upload and record pass.
    ///
    /// A replay is recorded only after its upload succeeded, and the record
    /// completes before the next replay is attempted.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, DeliveryError> {
        let candidates = self.scanner.scan(&self.config.replay_dir).await?;
        let mut report = CycleReport {
            scanned: candidates.len(),
            ..CycleReport::default()
        };

        for path in candidates {
            let replay = ReplayId::from_path(&path)
                .ok_or_else(|| DeliveryError::InvalidReplayName(path.clone()))?;

            if self.ledger.contains(&replay)? {
                tracing::trace!(%replay, "already uploaded");
                report.already_recorded.push(replay);
                continue;
            }

            match self.upload_with_retries(&path, &replay).await {
                Ok(attempt) => {
                    self.ledger.record(&replay)?;
                    tracing::info!(%replay, attempts = attempt.attempt, "recorded replay");
                    report.uploaded.push(replay);
                }
                Err(source) => match self.config.policy {
                    FailurePolicy::Abort => {
                        return Err(DeliveryError::Upload { replay, source });
                    }
                    FailurePolicy::Skip => {
                        tracing::warn!(
                            %replay,
                            error = %source,
                            "upload failed, leaving replay for the next cycle"
                        );
                        report.failed.push((replay, source.to_string()));
                    }
                },
            }
        }

        Ok(report)
    }

    async fn upload_with_retries(
        &self,
        path: &Path,
        replay: &ReplayId,
    ) -> Result<UploadAttempt, UploadError> {
        let max_attempts = self.config.upload_retries.saturating_add(1);
        let mut number = 1;

        loop {
            let attempt = UploadAttempt::start(replay.clone(), path, number);
            match self.uploader.upload(path, replay).await {
                Ok(()) => return Ok(attempt.succeed()),
                Err(e) if number >= max_attempts => return Err(e),
                Err(e) => {
                    let attempt = attempt.fail(e.to_string());
                    tracing::warn!(
                        %replay,
                        attempt = attempt.attempt,
                        max_attempts,
                        reason = attempt.failure_reason().unwrap_or_default(),
                        "upload attempt failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    number += 1;
                }
            }
        }
    }

    /// Run cycles until `shutdown` resolves or a cycle fails.
    ///
    /// Shutdown is only observed while sleeping between cycles.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), DeliveryError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            dir = %self.config.replay_dir.display(),
            interval_secs = self.config.interval.as_secs(),
            recorded = self.ledger.len(),
            "delivery loop started"
        );

        loop {
            let report = self.run_cycle().await?;
            if report.is_idle() {
                tracing::debug!(scanned = report.scanned, "nothing new");
            } else {
                tracing::info!(
                    scanned = report.scanned,
                    uploaded = report.uploaded.len(),
                    failed = report.failed.len(),
                    "cycle complete"
                );
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, stopping delivery loop");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
