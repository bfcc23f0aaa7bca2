//! Artwork download service.

use crate::models::config::ImageConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Fetches an image from a URL into a local file.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `url` to `dest`, overwriting any existing file.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// HTTP image fetcher.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ImageConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout))
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::ImageDownload(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(dest)?;
        file.write_all(&bytes)?;

        tracing::debug!("Downloaded {} to {}", url, dest.display());
        Ok(())
    }
}
