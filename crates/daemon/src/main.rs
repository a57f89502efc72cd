// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Courier Daemon (courierd)
//!
//! Watches a replay directory and uploads each new replay to a Slack channel once.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use courier_daemon::{lifecycle, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "courierd",
    version,
    about = "Upload new replay files to a Slack channel, once each"
)]
struct Args {
    /// Configuration file (JSON, or TOML when it ends in .toml)
    #[arg(long, default_value = "courier.json")]
    config: PathBuf,

    /// Ledger file, overrides LedgerPath from the configuration
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let log_guard = match setup_logging(args.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("courierd: failed to set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("courierd failed: {}", e);
            ExitCode::FAILURE
        }
    };

    // Flush the file appender before exiting
    drop(log_guard);
    code
}

async fn run(args: Args) -> Result<(), LifecycleError> {
    info!("Loading configuration from {}", args.config.display());
    let config = lifecycle::load_config(&args.config, args.ledger)?;

    let mut daemon = lifecycle::startup(config)?;

    let result = if args.once {
        daemon.run_once().await.map(|report| {
            info!(
                scanned = report.scanned,
                uploaded = report.uploaded.len(),
                failed = report.failed.len(),
                "single cycle complete"
            );
        })
    } else {
        match shutdown_signal() {
            Ok(shutdown) => daemon.run(shutdown).await,
            Err(e) => Err(e.into()),
        }
    };

    daemon.shutdown();
    result
}

/// Resolves on the first SIGTERM or SIGINT
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
    })
}

fn setup_logging(
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Optional file appender next to stderr
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let name = path
                .file_name()
                .ok_or_else(|| LifecycleError::LogPath(path.to_path_buf()))?;
            std::fs::create_dir_all(dir)?;

            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
