//! Asset download to disk.
//!
//! Streams the response body to a temp file next to the destination and
//! renames it into place, so an interrupted download never leaves a partial
//! artifact behind.

use crate::config::NetworkConfig;
use crate::error::{Result, SetupError};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix of the in-flight temp file.
const TEMP_SUFFIX: &str = ".part";

/// Downloads a release asset to a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into `destination`, creating parent directories as
    /// needed. Returns the number of bytes written.
    async fn download(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// Production downloader backed by `reqwest`.
///
/// The client has a connect timeout but no overall request timeout; release
/// archives can take a long time on slow links.
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| SetupError::Transport {
                url: NetworkConfig::GITHUB_API_BASE.to_string(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SetupError::io_with_path(e, parent))?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SetupError::DownloadFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::DownloadFailed {
                url: url.to_string(),
                message: format!("Download failed with status {status}"),
            });
        }

        let temp_path = PathBuf::from(format!("{}{}", destination.display(), TEMP_SUFFIX));

        match write_stream(response, url, &temp_path).await {
            Ok(bytes) => {
                std::fs::rename(&temp_path, destination).map_err(|e| {
                    let _ = std::fs::remove_file(&temp_path);
                    SetupError::io_with_path(e, destination)
                })?;
                info!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(bytes)
            }
            Err(e) => {
                let _ = std::fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }
}

async fn write_stream(response: reqwest::Response, url: &str, temp_path: &Path) -> Result<u64> {
    let mut file =
        std::fs::File::create(temp_path).map_err(|e| SetupError::io_with_path(e, temp_path))?;

    let mut bytes_written: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SetupError::DownloadFailed {
            url: url.to_string(),
            message: format!("Error reading download stream: {e}"),
        })?;

        file.write_all(&chunk)
            .map_err(|e| SetupError::io_with_path(e, temp_path))?;
        bytes_written += chunk.len() as u64;
    }

    file.flush()
        .map_err(|e| SetupError::io_with_path(e, temp_path))?;

    Ok(bytes_written)
}
