// Refery Infrastructure - SQLite Adapter
// Implements: ListingSource

mod connection;
mod error;
mod listing_source;
mod migration;

pub use connection::create_pool;
pub use listing_source::SqliteListingSource;
pub use migration::{current_version, run_migrations};

// Note: sqlx::Error conversion goes through error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
