//! RPC Request/Response Types

use refery_core::domain::{SitemapStats, SourceKind};
use serde::{Deserialize, Serialize};

/// sitemap.generate.v1 - Regenerate the sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub xml: String,
    pub url_count: usize,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<SourceKind>,
}

/// sitemap.stats.v1 - Aggregate counts
pub type StatsResponse = SitemapStats;
