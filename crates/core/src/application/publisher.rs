// Sitemap Publisher
// Periodically regenerates the sitemap and hands it to a sink

use crate::application::sitemap::SitemapBuilder;
use crate::error::Result;
use crate::port::SitemapSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Longest supported interval (one year)
pub const MAX_PUBLISH_INTERVAL_MINUTES: u64 = 60 * 24 * 365;

/// Sitemap publisher
///
/// Runs `generate` on a fixed interval and publishes the result.
pub struct SitemapPublisher {
    builder: Arc<SitemapBuilder>,
    sink: Arc<dyn SitemapSink>,
    interval_minutes: u64,
}

impl SitemapPublisher {
    /// Create a new publisher
    ///
    /// # Arguments
    /// * `builder` - Shared sitemap builder
    /// * `sink` - Where each generated document goes
    /// * `interval_minutes` - How often to regenerate, clamped to
    ///   `1..=MAX_PUBLISH_INTERVAL_MINUTES`
    pub fn new(
        builder: Arc<SitemapBuilder>,
        sink: Arc<dyn SitemapSink>,
        interval_minutes: u64,
    ) -> Self {
        Self {
            builder,
            sink,
            interval_minutes: interval_minutes.clamp(1, MAX_PUBLISH_INTERVAL_MINUTES),
        }
    }

    /// Run publish loop (background task)
    ///
    /// The first tick fires immediately. Should be spawned in tokio::spawn
    pub async fn run(self) {
        info!(
            interval_minutes = self.interval_minutes,
            "Sitemap publisher started"
        );

        let mut tick = interval(self.period());

        loop {
            tick.tick().await;

            if let Err(e) = self.run_now().await {
                error!(error = ?e, "Scheduled sitemap publish failed");
            }
        }
    }

    fn period(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// Generate and publish once
    pub async fn run_now(&self) -> Result<usize> {
        let xml = self.builder.generate().await?;
        self.sink.publish(&xml).await?;

        info!(bytes = xml.len(), "Sitemap published");

        Ok(xml.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sitemap::SitemapConfig;
    use crate::domain::{JobRecord, ProfileRecord};
    use crate::error::AppError;
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::ListingSource;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct EmptySource;

    #[async_trait]
    impl ListingSource for EmptySource {
        async fn fetch_open_jobs(&self) -> Result<Vec<JobRecord>> {
            Ok(vec![])
        }
        async fn fetch_public_profiles(&self) -> Result<Vec<ProfileRecord>> {
            Ok(vec![])
        }
        async fn count_open_jobs(&self) -> Result<i64> {
            Ok(0)
        }
        async fn count_public_profiles(&self) -> Result<i64> {
            Ok(0)
        }
    }

    #[derive(Default)]
    struct MemorySink {
        published: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl SitemapSink for MemorySink {
        async fn publish(&self, xml: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.published.lock().await.push(xml.to_string());
            Ok(())
        }
    }

    fn builder() -> Arc<SitemapBuilder> {
        Arc::new(SitemapBuilder::new(
            Arc::new(EmptySource),
            Arc::new(FixedTimeProvider(0)),
            SitemapConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_run_now_publishes_document() {
        let sink = Arc::new(MemorySink::default());
        let publisher = SitemapPublisher::new(builder(), sink.clone(), 60);

        let bytes = publisher.run_now().await.unwrap();

        let published = sink.published.lock().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].len(), bytes);
        assert!(published[0].starts_with("<?xml"));
    }

    #[tokio::test]
    async fn test_run_now_surfaces_sink_error() {
        let sink = Arc::new(MemorySink {
            fail: true,
            ..Default::default()
        });
        let publisher = SitemapPublisher::new(builder(), sink, 60);

        tokio_test::assert_err!(publisher.run_now().await);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let publisher = SitemapPublisher::new(builder(), Arc::new(MemorySink::default()), 0);
        assert_eq!(publisher.interval_minutes, 1);
    }

    #[test]
    fn test_huge_interval_is_clamped() {
        let publisher =
            SitemapPublisher::new(builder(), Arc::new(MemorySink::default()), u64::MAX);
        assert_eq!(publisher.interval_minutes, MAX_PUBLISH_INTERVAL_MINUTES);
        assert_eq!(
            publisher.period(),
            Duration::from_secs(MAX_PUBLISH_INTERVAL_MINUTES * 60)
        );
    }
}
