//! Refery SDK - Rust Client Library
//!
//! Typed client for the Refery sitemap daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use refery_sdk::ReferyClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReferyClient::connect("http://127.0.0.1:9527").await?;
//!
//!     let sitemap = client.generate_sitemap().await?;
//!     println!("{} URLs generated at {}", sitemap.url_count, sitemap.generated_at);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::ReferyClient;
pub use error::{Result, SdkError};
pub use types::{SitemapResponse, SitemapStats};
