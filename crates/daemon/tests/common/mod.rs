// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for courierd integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Endpoint nothing listens on; uploads fail with a transport error
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1/api/files.upload";

/// Temp directory with a `replays/` folder and a `courier.json` pointing at it.
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("courier.json")
    }

    pub fn replays(&self) -> PathBuf {
        self.temp.path().join("replays")
    }

    pub fn ledger(&self) -> PathBuf {
        self.temp.path().join("posted_replays.ledger")
    }

    pub fn lock(&self) -> PathBuf {
        self.temp.path().join("posted_replays.ledger.lock")
    }

    pub fn add_replay(&self, name: &str) {
        std::fs::write(self.replays().join(name), b"GIF89a").expect("Failed to write replay");
    }

    /// Rewrite the config with an extra raw JSON member, e.g. `"CheckInterval": "1s"`
    pub fn write_config(&self, extra: &str) {
        let mut body = format!(
            r#""ReplayDirectoryPath": "{}",
    "AuthToken": "xoxb-test",
    "ChannelID": "C024BE91L",
    "ApiUrl": "{}",
    "LedgerPath": "{}""#,
            self.replays().display(),
            UNREACHABLE_API,
            self.ledger().display()
        );
        if !extra.is_empty() {
            body.push_str(",\n    ");
            body.push_str(extra);
        }
        std::fs::write(self.config_path(), format!("{{\n    {}\n}}\n", body))
            .expect("Failed to write config");
    }
}

/// Setup test environment with an empty replay directory and a valid config.
pub fn setup_test_env() -> TestEnv {
    let env = TestEnv {
        temp: TempDir::new().expect("Failed to create temp directory"),
    };
    std::fs::create_dir(env.replays()).expect("Failed to create replay dir");
    env.write_config("");
    env
}

/// Poll until `path` contains `needle` or the timeout elapses
pub fn wait_for_content(path: &Path, needle: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if std::fs::read_to_string(path).is_ok_and(|c| c.contains(needle)) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}
