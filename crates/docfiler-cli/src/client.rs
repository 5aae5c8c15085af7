use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to contact local AI server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct SummaryReply {
    summary: String,
}

/// Blocking client for the relay's upload endpoint. One user action at a
/// time: each call blocks until the relay (and behind it, the model) answers.
pub struct SummaryClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl SummaryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // The default 30s would cut off slow model calls.
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Poll the readiness endpoint until it answers or the timeout elapses.
    pub fn ready(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.http.get(format!("{}/healthz", self.base_url)).send() {
                Ok(resp) if resp.status().is_success() => return true,
                _ if Instant::now() >= deadline => return false,
                _ => std::thread::sleep(Duration::from_millis(50)),
            }
        }
    }

    /// Upload a file and return the raw reply text. Transport failures and
    /// non-success statuses abort the operation before any filesystem side
    /// effects can happen.
    pub fn upload(&self, path: &Path) -> Result<String, ClientError> {
        let data = std::fs::read(path).map_err(|source| ClientError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let part = reqwest::blocking::multipart::Part::bytes(data).file_name(filename);
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let reply: SummaryReply = resp.json()?;
        Ok(reply.summary)
    }
}
