// Sitemap Sink Port

use crate::error::Result;
use async_trait::async_trait;

/// Destination for a freshly generated sitemap document
#[async_trait]
pub trait SitemapSink: Send + Sync {
    /// Persist the XML document, replacing any previous one
    async fn publish(&self, xml: &str) -> Result<()>;
}
