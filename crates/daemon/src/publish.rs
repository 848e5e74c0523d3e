//! File sink for the periodic publisher

use async_trait::async_trait;
use refery_core::application::sitemap::constants::SITEMAP_FILE_NAME;
use refery_core::error::Result;
use refery_core::port::SitemapSink;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `sitemap.xml` into a directory, replacing it atomically
pub struct FileSitemapSink {
    dir: PathBuf,
}

impl FileSitemapSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn target(&self) -> PathBuf {
        self.dir.join(SITEMAP_FILE_NAME)
    }
}

#[async_trait]
impl SitemapSink for FileSitemapSink {
    async fn publish(&self, xml: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.target();
        let staging = staging_path(&target);

        // Readers never observe a half-written file
        tokio::fs::write(&staging, xml).await?;
        tokio::fs::rename(&staging, &target).await?;

        debug!(path = %target.display(), bytes = xml.len(), "Sitemap written");
        Ok(())
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSitemapSink::new(dir.path().join("public"));

        sink.publish("<urlset/>").await.unwrap();

        let written = std::fs::read_to_string(sink.target()).unwrap();
        assert_eq!(written, "<urlset/>");
        assert!(!staging_path(&sink.target()).exists());
    }

    #[tokio::test]
    async fn test_publish_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSitemapSink::new(dir.path());

        sink.publish("first").await.unwrap();
        sink.publish("second").await.unwrap();

        assert_eq!(std::fs::read_to_string(sink.target()).unwrap(), "second");
    }
}
