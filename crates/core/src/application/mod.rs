// Application Layer - Use Cases and Business Logic

pub mod publisher;
pub mod sitemap;

// Re-exports
pub use publisher::{SitemapPublisher, MAX_PUBLISH_INTERVAL_MINUTES};
pub use sitemap::{SitemapBuilder, SitemapConfig, SitemapDocument};
