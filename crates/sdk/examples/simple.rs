//! Simple SDK Example
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package refery-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package refery-sdk --example simple
//!    ```

use refery_sdk::ReferyClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::var("REFERY_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:9527".into());
    let client = ReferyClient::connect(&url).await?;

    let stats = client.stats().await?;
    println!("Static pages:      {}", stats.static_pages);
    println!("Job listings:      {}", stats.job_listings);
    println!("Referrer profiles: {}", stats.referrer_profiles);
    println!("Total URLs:        {}", stats.total_urls);

    let path = client.download_sitemap(".").await?;
    println!("Sitemap written to {}", path.display());

    Ok(())
}
