// Domain Layer - Pure business logic and entities

pub mod entry;
pub mod error;
pub mod record;
pub mod route;
pub mod stats;

// Re-exports
pub use entry::{ChangeFrequency, Priority, SitemapEntry};
pub use error::DomainError;
pub use record::{JobRecord, ProfileRecord};
pub use route::{StaticRoute, STATIC_ROUTES};
pub use stats::{SitemapStats, SourceKind};
