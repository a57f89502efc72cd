// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, single-writer lock, shutdown.

use std::ffi::OsString;
use std::fs::File;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use courier_adapters::{
    FsScanner, SlackUploader, TracedScanAdapter, TracedUploadAdapter, UploadError,
};
use courier_core::{Config, ConfigError};
use courier_engine::{CycleReport, DeliveryConfig, DeliveryDeps, DeliveryError, DeliveryLoop};
use courier_storage::{FileLedger, Ledger, LedgerError};
use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};

/// Delivery loop with concrete adapter types (wrapped with tracing)
pub type DaemonDelivery =
    DeliveryLoop<TracedScanAdapter<FsScanner>, TracedUploadAdapter<SlackUploader>, FileLedger>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to acquire lock {}: courierd already running?", .0.display())]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Failed to build upload client: {0}")]
    Client(#[source] UploadError),

    #[error("Invalid log file path: {}", .0.display())]
    LogPath(PathBuf),

    #[error("{0}")]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load configuration, letting `--ledger` override `LedgerPath`
pub fn load_config(path: &Path, ledger: Option<PathBuf>) -> Result<Config, LifecycleError> {
    let mut config = Config::load(path)?;
    if let Some(ledger) = ledger {
        config.ledger_path = ledger;
    }
    Ok(config)
}

/// Lock file guarding a ledger: `<ledger>.lock`
pub fn lock_path_for(ledger: &Path) -> PathBuf {
    let mut name = OsString::from(ledger.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Running daemon
pub struct Daemon {
    config: Config,
    lock_path: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    delivery: DaemonDelivery,
}

impl Daemon {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn ledger(&self) -> &FileLedger {
        self.delivery.ledger()
    }

    /// Run a single delivery cycle
    pub async fn run_once(&mut self) -> Result<CycleReport, LifecycleError> {
        Ok(self.delivery.run_cycle().await?)
    }

    /// Run the delivery loop until `shutdown` resolves or a cycle fails
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()>,
    {
        Ok(self.delivery.run(shutdown).await?)
    }

    /// Release the lock and remove the lock file
    pub fn shutdown(self) {
        info!("Shutting down courierd...");

        if self.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.lock_path) {
                warn!("Failed to remove lock file: {}", e);
            }
        }

        // Lock is released when self.lock_file is dropped
        info!("courierd stopped");
    }
}

/// Start the daemon
pub fn startup(config: Config) -> Result<Daemon, LifecycleError> {
    let lock_path = lock_path_for(&config.ledger_path);
    match startup_inner(config, &lock_path) {
        Ok(daemon) => Ok(daemon),
        Err(e) => {
            // A lock held by another process is not ours to remove
            if !matches!(e, LifecycleError::LockFailed(..)) {
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - the lock file is removed if this fails
fn startup_inner(config: Config, lock_path: &Path) -> Result<Daemon, LifecycleError> {
    // 1. Create the ledger directory (needed for the lock)
    if let Some(parent) = config.ledger_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 2. Acquire lock file FIRST - one writer per ledger
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|e| LifecycleError::LockFailed(lock_path.to_path_buf(), e))?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Load the ledger
    let ledger = FileLedger::initialize(&config.ledger_path)?;
    info!(
        "Loaded ledger {}: {} replays already uploaded",
        config.ledger_path.display(),
        ledger.len()
    );

    // 4. Set up adapters (wrapped with tracing for observability)
    let scanner = TracedScanAdapter::new(FsScanner::new(config.replay_extension.clone()));
    let uploader = TracedUploadAdapter::new(
        SlackUploader::from_config(&config).map_err(LifecycleError::Client)?,
    );

    // 5. Create the delivery loop
    let delivery = DeliveryLoop::new(
        DeliveryDeps {
            scanner,
            uploader,
            ledger,
        },
        DeliveryConfig::from(&config),
    );

    info!(
        "courierd started: watching {} for *.{}",
        config.replay_directory_path.display(),
        config.replay_extension
    );

    Ok(Daemon {
        config,
        lock_path: lock_path.to_path_buf(),
        lock_file,
        delivery,
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
