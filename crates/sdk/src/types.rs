//! SDK Request/Response Types

use serde::{Deserialize, Serialize};

/// Result of `sitemap.generate.v1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapResponse {
    pub xml: String,
    pub url_count: usize,
    pub generated_at: String,
    /// Data sources that could not be read (`jobs`, `referrer_profiles`)
    #[serde(default)]
    pub failed_sources: Vec<String>,
}

impl SitemapResponse {
    /// True when every data source contributed
    pub fn is_complete(&self) -> bool {
        self.failed_sources.is_empty()
    }
}

/// Result of `sitemap.stats.v1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapStats {
    pub total_urls: u64,
    pub static_pages: u64,
    pub job_listings: u64,
    pub referrer_profiles: u64,
    pub last_generated: String,
    #[serde(default)]
    pub failed_sources: Vec<String>,
}
