//! HTTP transport for the package archive

use crate::core::{InstallerError, InstallerResult};
use crate::di::PackageClient;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Downloads the package archive with a single unauthenticated GET
pub struct HttpPackageClient {
    client: Client,
}

impl HttpPackageClient {
    /// Create a new client with transport defaults
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpPackageClient {
    fn default() -> Self {
        Self::new()
    }
}

fn network_error(url: &str, source: reqwest::Error) -> InstallerError {
    InstallerError::Network {
        url: url.to_string(),
        source,
    }
}

#[async_trait]
impl PackageClient for HttpPackageClient {
    async fn download_archive(&self, url: &str, dest: &Path) -> InstallerResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?
            .error_for_status()
            .map_err(|e| network_error(url, e))?;

        // create_new: a stale file from an earlier run is never reused
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .await
            .map_err(|e| {
                InstallerError::Filesystem(format!("Failed to create {}: {}", dest.display(), e))
            })?;

        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| network_error(url, e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url, bytes = written, dest = %dest.display(), "Downloaded archive");
        Ok(written)
    }
}
