// Port Layer - Interfaces for external dependencies

pub mod listing_source;
pub mod sitemap_sink;
pub mod time_provider;

// Re-exports
pub use listing_source::ListingSource;
pub use sitemap_sink::SitemapSink;
pub use time_provider::TimeProvider;
