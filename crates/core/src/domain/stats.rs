// Sitemap Statistics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dynamic listing category fetched from the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Jobs,
    ReferrerProfiles,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Jobs => write!(f, "jobs"),
            SourceKind::ReferrerProfiles => write!(f, "referrer_profiles"),
        }
    }
}

/// Aggregate snapshot shown next to the generated sitemap
///
/// `failed_sources` lists categories whose count query failed; their count is 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapStats {
    pub total_urls: u64,
    pub static_pages: u64,
    pub job_listings: u64,
    pub referrer_profiles: u64,
    pub last_generated: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<SourceKind>,
}

impl SitemapStats {
    pub fn new(
        static_pages: u64,
        job_listings: u64,
        referrer_profiles: u64,
        last_generated: impl Into<String>,
        failed_sources: Vec<SourceKind>,
    ) -> Self {
        Self {
            total_urls: static_pages + job_listings + referrer_profiles,
            static_pages,
            job_listings,
            referrer_profiles,
            last_generated: last_generated.into(),
            failed_sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_parts() {
        let stats = SitemapStats::new(5, 12, 3, "2024-06-01T00:00:00.000Z", vec![]);
        assert_eq!(stats.total_urls, 20);
        assert_eq!(
            stats.total_urls,
            stats.static_pages + stats.job_listings + stats.referrer_profiles
        );
    }

    #[test]
    fn test_failed_sources_omitted_when_empty() {
        let stats = SitemapStats::new(5, 0, 0, "t", vec![]);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("failed_sources").is_none());

        let stats = SitemapStats::new(5, 0, 0, "t", vec![SourceKind::Jobs]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["failed_sources"], serde_json::json!(["jobs"]));
    }
}
