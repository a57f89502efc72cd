// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for courierd
//!
//! Black-box: run the binary against a temp directory and check exit codes,
//! stderr and the ledger file.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::{setup_test_env, wait_for_content};
use predicates::prelude::*;
use std::time::{Duration, Instant};

fn courierd(env: &common::TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("courierd").unwrap();
    cmd.current_dir(env.temp.path())
        .env("RUST_LOG", "info")
        .arg("--config")
        .arg(env.config_path());
    cmd
}

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("courierd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--once"))
        .stdout(predicate::str::contains("--ledger"));
}

#[test]
fn test_missing_config_fails() {
    let env = setup_test_env();

    Command::cargo_bin("courierd")
        .unwrap()
        .current_dir(env.temp.path())
        .args(["--config", "nope.json", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn test_unknown_config_key_fails() {
    let env = setup_test_env();
    env.write_config(r#""Colour": "blue""#);

    courierd(&env)
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Colour"));
    assert!(!env.ledger().exists());
}

#[test]
fn test_once_on_empty_directory_creates_ledger() {
    let env = setup_test_env();

    courierd(&env).arg("--once").assert().success();

    assert!(env.ledger().exists());
    assert_eq!(std::fs::read_to_string(env.ledger()).unwrap(), "");
    assert!(!env.lock().exists());
}

#[test]
fn test_missing_replay_directory_fails() {
    let env = setup_test_env();
    std::fs::remove_dir(env.replays()).unwrap();

    courierd(&env)
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan error"));
}

#[test]
fn test_unreachable_api_fails_without_recording() {
    let env = setup_test_env();
    env.add_replay("a.gif");

    courierd(&env)
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.gif"));

    assert_eq!(std::fs::read_to_string(env.ledger()).unwrap(), "");
}

#[test]
fn test_recorded_replay_is_not_uploaded_again() {
    let env = setup_test_env();
    env.add_replay("a.gif");
    std::fs::write(env.replays().join("c.txt"), "notes").unwrap();
    {
        use courier_storage::Ledger;
        let mut ledger = courier_storage::FileLedger::initialize(&env.ledger()).unwrap();
        ledger.record(&courier_core::ReplayId::new("a.gif")).unwrap();
    }

    // The API is unreachable, so success means no upload was attempted
    courierd(&env).arg("--once").assert().success();
}

#[test]
fn test_ledger_flag_overrides_config() {
    let env = setup_test_env();
    let other = env.temp.path().join("state/other.ledger");

    courierd(&env)
        .arg("--once")
        .arg("--ledger")
        .arg(&other)
        .assert()
        .success();

    assert!(other.exists());
    assert!(!env.ledger().exists());
}

#[test]
fn test_log_file_receives_logs() {
    let env = setup_test_env();
    let log = env.temp.path().join("logs/courierd.log");

    courierd(&env)
        .arg("--once")
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("courierd started"), "log was:\n{}", content);
}

#[test]
fn test_sigterm_stops_loop_cleanly() {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let env = setup_test_env();
    env.write_config(r#""CheckInterval": "1h""#);
    let log = env.temp.path().join("courierd.log");

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("courierd"))
        .current_dir(env.temp.path())
        .arg("--config")
        .arg(env.config_path())
        .arg("--log-file")
        .arg(&log)
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();

    assert!(
        wait_for_content(&log, "delivery loop started", Duration::from_secs(10)),
        "courierd did not start"
    );

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if start.elapsed() > Duration::from_secs(10) {
            let _ = child.kill();
            panic!("courierd did not exit after SIGTERM");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(status.success(), "exit status: {:?}", status);
    assert!(!env.lock().exists());
}
