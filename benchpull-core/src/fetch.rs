// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Streaming HTTP fetcher.
//!
//! Downloads one resource to disk chunk by chunk; the body is never buffered
//! whole. One attempt per call: no retry, no mirror fallback.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::config::NetworkConfig;
use crate::error::FetchError;
use crate::types::HttpUrl;

/// A downloaded file inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// HTTP client with explicit timeouts.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher. Both timeouts come from configuration.
    pub fn new(network: &NetworkConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(network.connect_timeout)
            .timeout(network.request_timeout)
            .user_agent(concat!("benchpull/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Download `<base_url>/<filename>` to `destination`.
    pub async fn fetch(
        &self,
        base_url: &HttpUrl,
        filename: &str,
        destination: &Path,
    ) -> Result<FetchedArtifact, FetchError> {
        let url = base_url.join(filename);
        self.fetch_url(&url, destination).await
    }

    /// Download a complete URL to `destination`, overwriting it.
    ///
    /// A partially written file is removed when the download fails.
    pub async fn fetch_url(&self, url: &str, destination: &Path) -> Result<FetchedArtifact, FetchError> {
        tracing::info!(url = %url, path = %destination.display(), "Starting download");

        match self.stream_to_file(url, destination).await {
            Ok(bytes) => {
                tracing::info!(url = %url, bytes = bytes, "Download complete");
                Ok(FetchedArtifact {
                    url: url.to_string(),
                    path: destination.to_path_buf(),
                    bytes,
                })
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(destination).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %destination.display(),
                            error = %cleanup,
                            "Failed to remove partial download"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn stream_to_file(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let write_err = |e: std::io::Error| FetchError::Write {
            path: destination.to_path_buf(),
            source: e,
        };

        let mut file = tokio::fs::File::create(destination).await.map_err(write_err)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })? {
            file.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }

        // Fully drained and on disk before anyone hashes it.
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;

        Ok(written)
    }
}
