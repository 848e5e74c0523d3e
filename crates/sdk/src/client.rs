//! Refery Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{SitemapResponse, SitemapStats};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Refery daemon client
///
/// # Example
///
/// ```no_run
/// # use refery_sdk::ReferyClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReferyClient::connect("http://127.0.0.1:9527").await?;
/// let stats = client.stats().await?;
/// println!("{} URLs", stats.total_urls);
/// # Ok(())
/// # }
/// ```
pub struct ReferyClient {
    client: HttpClient,
}

impl ReferyClient {
    /// Connect to the daemon (e.g. `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url.as_ref())
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Regenerate the sitemap
    pub async fn generate_sitemap(&self) -> Result<SitemapResponse> {
        let response: SitemapResponse = self
            .client
            .request("sitemap.generate.v1", rpc_params![])
            .await?;

        Ok(response)
    }

    /// Regenerate and write `sitemap.xml` into `dir`; returns the written path
    pub async fn download_sitemap(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let response = self.generate_sitemap().await?;

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(SITEMAP_FILE_NAME);
        tokio::fs::write(&target, response.xml).await?;

        Ok(target)
    }

    /// Aggregate URL counts
    pub async fn stats(&self) -> Result<SitemapStats> {
        let stats: SitemapStats = self
            .client
            .request("sitemap.stats.v1", rpc_params![])
            .await?;

        Ok(stats)
    }
}
