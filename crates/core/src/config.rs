// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Courier configuration
//!
//! Read once at startup from a JSON file (or TOML, by extension) and handed to
//! the scanner, upload client, and delivery loop. Nothing re-reads or mutates it.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Slack file upload endpoint
pub const DEFAULT_API_URL: &str = "https://slack.com/api/files.upload";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid TOML in config {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// API credential. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw credential, for building requests only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// What the delivery loop does when a file still fails after its retries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the process on the first failed upload
    #[default]
    Abort,
    /// Leave the file unrecorded and move on; the next cycle retries it
    Skip,
}

/// Courier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Config {
    /// Directory watched for replays
    #[serde(alias = "replayDirectoryPath", alias = "replaydirectorypath")]
    pub replay_directory_path: PathBuf,
    #[serde(alias = "authToken", alias = "authtoken")]
    pub auth_token: AuthToken,
    /// Destination channel
    #[serde(
        rename = "ChannelID",
        alias = "ChannelId",
        alias = "channelID",
        alias = "channelId",
        alias = "channelid"
    )]
    pub channel_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Append-only record of uploaded replays
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// Replay file extension, without the dot
    #[serde(default = "default_replay_extension")]
    pub replay_extension: String,
    /// Sleep between scan cycles
    #[serde(default = "default_check_interval", with = "humantime_serde")]
    pub check_interval: Duration,
    #[serde(default)]
    pub on_upload_error: FailurePolicy,
    /// Extra attempts per file within one cycle
    #[serde(default)]
    pub upload_retries: u32,
    #[serde(default = "default_retry_delay", with = "humantime_serde")]
    pub retry_delay: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("./posted_replays.ledger")
}

fn default_replay_extension() -> String {
    "gif".to_string()
}

fn default_check_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(5)
}

impl Config {
    /// Load and validate configuration from a file.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = if path.extension().is_some_and(|e| e == "toml") {
            Self::from_toml(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::from_json(&content).map_err(|source| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            })?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replay_directory_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "ReplayDirectoryPath must not be empty".to_string(),
            ));
        }
        if self.auth_token.expose().trim().is_empty() {
            return Err(ConfigError::Invalid("AuthToken must not be empty".to_string()));
        }
        if self.channel_id.trim().is_empty() {
            return Err(ConfigError::Invalid("ChannelID must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "ApiUrl must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.replay_extension.is_empty()
            || self.replay_extension.starts_with('.')
            || self.replay_extension.contains(['/', '\\'])
        {
            return Err(ConfigError::Invalid(format!(
                "ReplayExtension must be a bare extension such as \"gif\", got {:?}",
                self.replay_extension
            )));
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "CheckInterval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
