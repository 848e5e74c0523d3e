//! RPC Method Handlers

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{GenerateResponse, StatsResponse};
use jsonrpsee::types::ErrorObjectOwned;
use refery_core::application::SitemapBuilder;
use std::sync::Arc;
use tracing::{info, warn};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    builder: Arc<SitemapBuilder>,
    rate_limiter: RateLimiter,
}

impl RpcHandler {
    pub fn new(builder: Arc<SitemapBuilder>, rate_limiter: RateLimiter) -> Self {
        Self {
            builder,
            rate_limiter,
        }
    }

    /// sitemap.generate.v1
    pub async fn generate(&self) -> Result<GenerateResponse, ErrorObjectOwned> {
        if !self.rate_limiter.try_acquire() {
            warn!("sitemap.generate.v1 throttled");
            return Err(throttled());
        }

        let document = self
            .builder
            .generate_report()
            .await
            .map_err(to_rpc_error)?;

        info!(
            url_count = document.entries.len(),
            bytes = document.xml.len(),
            "sitemap.generate.v1 served"
        );

        Ok(GenerateResponse {
            url_count: document.entries.len(),
            xml: document.xml,
            generated_at: document.generated_at,
            failed_sources: document.failed_sources,
        })
    }

    /// sitemap.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(self.builder.stats().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use async_trait::async_trait;
    use refery_core::application::SitemapConfig;
    use refery_core::domain::{JobRecord, ProfileRecord, SourceKind};
    use refery_core::error::{AppError, Result};
    use refery_core::port::time_provider::FixedTimeProvider;
    use refery_core::port::ListingSource;

    struct StubSource {
        fail_profiles: bool,
    }

    #[async_trait]
    impl ListingSource for StubSource {
        async fn fetch_open_jobs(&self) -> Result<Vec<JobRecord>> {
            Ok(vec![JobRecord {
                id: "42".to_string(),
                title: Some("Backend Engineer".to_string()),
                status: "Open".to_string(),
                updated_at: Some("2024-06-01T00:00:00Z".to_string()),
                created_at: None,
            }])
        }

        async fn fetch_public_profiles(&self) -> Result<Vec<ProfileRecord>> {
            if self.fail_profiles {
                return Err(AppError::Database("no such table".to_string()));
            }
            Ok(vec![])
        }

        async fn count_open_jobs(&self) -> Result<i64> {
            Ok(1)
        }

        async fn count_public_profiles(&self) -> Result<i64> {
            if self.fail_profiles {
                return Err(AppError::Database("no such table".to_string()));
            }
            Ok(0)
        }
    }

    fn handler(fail_profiles: bool, burst: u32) -> RpcHandler {
        let builder = SitemapBuilder::new(
            Arc::new(StubSource { fail_profiles }),
            Arc::new(FixedTimeProvider(1_717_200_000_000)),
            SitemapConfig::default(),
        );
        RpcHandler::new(Arc::new(builder), RateLimiter::new(burst, 0))
    }

    #[tokio::test]
    async fn test_generate() {
        let response = handler(false, 10).generate().await.unwrap();

        assert_eq!(response.url_count, 6);
        assert_eq!(response.generated_at, "2024-06-01T00:00:00.000Z");
        assert!(response.xml.contains("<loc>https://refery.io/jobs/42</loc>"));
        assert!(response.failed_sources.is_empty());
    }

    #[tokio::test]
    async fn test_generate_reports_failed_source() {
        let response = handler(true, 10).generate().await.unwrap();

        assert_eq!(response.url_count, 6);
        assert_eq!(response.failed_sources, vec![SourceKind::ReferrerProfiles]);
    }

    #[tokio::test]
    async fn test_generate_throttled() {
        let handler = handler(false, 1);

        tokio_test::assert_ok!(handler.generate().await);
        let err = handler.generate().await.unwrap_err();
        assert_eq!(err.code(), code::THROTTLED);
    }

    #[tokio::test]
    async fn test_stats_not_rate_limited() {
        let handler = handler(false, 1);
        handler.generate().await.unwrap();

        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.total_urls, 6);
        assert_eq!(stats.job_listings, 1);
    }

    #[tokio::test]
    async fn test_stats_json_shape() {
        let stats = handler(true, 1).stats().await.unwrap();
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["total_urls"], 6);
        assert_eq!(json["referrer_profiles"], 0);
        assert_eq!(json["failed_sources"][0], "referrer_profiles");
    }
}
