// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slack `files.upload` client

use super::{UploadAdapter, UploadError};
use async_trait::async_trait;
use courier_core::{AuthToken, Config, ReplayId};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;

/// Body returned by the API. Only `ok` and `error` matter.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Decide whether a response means the upload went through.
///
/// Requires both a 200 status and `"ok": true` in a JSON body. When the API
/// answers `"ok": false`, its `error` string becomes the failure reason.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<(), UploadError> {
    if status != StatusCode::OK {
        return Err(UploadError::Status {
            status: status.as_u16(),
        });
    }

    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    if response.ok {
        Ok(())
    } else {
        Err(UploadError::Rejected(
            response.error.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}

/// Uploads replays to a Slack channel
#[derive(Clone, Debug)]
pub struct SlackUploader {
    client: Client,
    api_url: String,
    token: AuthToken,
    channel: String,
}

impl SlackUploader {
    pub fn new(
        api_url: impl Into<String>,
        token: AuthToken,
        channel: impl Into<String>,
    ) -> Result<Self, UploadError> {
        let client = Client::builder()
            .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, api_url, token, channel))
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(
        client: Client,
        api_url: impl Into<String>,
        token: AuthToken,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token,
            channel: channel.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        Self::new(
            config.api_url.clone(),
            config.auth_token.clone(),
            config.channel_id.clone(),
        )
    }

    fn form(&self, replay: &ReplayId, content: Vec<u8>) -> Form {
        Form::new()
            .part("file", Part::bytes(content).file_name(replay.to_string()))
            .text("token", self.token.expose().to_string())
            .text("filename", replay.to_string())
            .text("channels", self.channel.clone())
    }
}

#[async_trait]
impl UploadAdapter for SlackUploader {
    async fn upload(&self, path: &Path, replay: &ReplayId) -> Result<(), UploadError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let response = self
            .client
            .post(&self.api_url)
            .multipart(self.form(replay, content))
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let result = interpret_response(status, &body);
        if let Err(UploadError::MalformedResponse(_)) = &result {
            tracing::warn!(%body, "could not parse API response body");
        }
        result
    }
}

#[cfg(test)]
#[path = "slack_tests.rs"]
mod tests;
