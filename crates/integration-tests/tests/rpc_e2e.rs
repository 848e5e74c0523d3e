//! JSON-RPC round trip: SQLite -> builder -> server -> SDK client

use std::sync::Arc;

use refery_api_rpc::{RpcServer, RpcServerConfig};
use refery_core::application::{SitemapBuilder, SitemapConfig};
use refery_core::domain::JobRecord;
use refery_core::port::time_provider::FixedTimeProvider;
use refery_infra_sqlite::{create_pool, run_migrations, SqliteListingSource};
use refery_sdk::ReferyClient;

async fn start_server(rate_limit_burst: u32) -> (ReferyClient, jsonrpsee::server::ServerHandle) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    let source = SqliteListingSource::new(pool);
    source
        .insert_company("acme", "Acme", "2024-01-01T00:00:00Z")
        .await
        .unwrap();
    source
        .insert_job(
            "acme",
            &JobRecord {
                id: "42".to_string(),
                title: Some("Backend Engineer".to_string()),
                status: "Open".to_string(),
                updated_at: Some("2024-06-01T00:00:00Z".to_string()),
                created_at: None,
            },
        )
        .await
        .unwrap();

    let builder = Arc::new(SitemapBuilder::new(
        Arc::new(source),
        Arc::new(FixedTimeProvider(1_717_286_400_000)),
        SitemapConfig::default(),
    ));

    let config = RpcServerConfig {
        port: 0,
        rate_limit_burst,
        rate_limit_per_sec: 0,
        ..Default::default()
    };
    let (addr, handle) = RpcServer::new(config, builder).start().await.unwrap();

    let client = ReferyClient::connect(format!("http://{}", addr))
        .await
        .unwrap();
    (client, handle)
}

#[tokio::test]
async fn test_generate_over_rpc() {
    let (client, handle) = start_server(10).await;

    let response = client.generate_sitemap().await.unwrap();
    assert_eq!(response.url_count, 6);
    assert_eq!(response.generated_at, "2024-06-02T00:00:00.000Z");
    assert!(response.is_complete());
    assert!(response.xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(response.xml.ends_with("</urlset>"));
    assert!(response.xml.contains("<loc>https://refery.io/jobs/42</loc>"));

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_stats_over_rpc() {
    let (client, handle) = start_server(10).await;

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_urls, 6);
    assert_eq!(stats.static_pages, 5);
    assert_eq!(stats.job_listings, 1);
    assert_eq!(stats.referrer_profiles, 0);
    assert!(stats.failed_sources.is_empty());

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_generate_throttled_over_rpc() {
    let (client, handle) = start_server(1).await;

    client.generate_sitemap().await.unwrap();
    let err = client.generate_sitemap().await.unwrap_err();
    assert!(err.is_throttled(), "unexpected error: {}", err);

    // Stats are not rate limited
    assert!(client.stats().await.is_ok());

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_download_sitemap() {
    let (client, handle) = start_server(10).await;
    let dir = tempfile::tempdir().unwrap();

    let path = client.download_sitemap(dir.path().join("public")).await.unwrap();

    assert!(path.ends_with("public/sitemap.xml"));
    let xml = std::fs::read_to_string(path).unwrap();
    assert!(xml.contains("<loc>https://refery.io/</loc>"));

    handle.stop().unwrap();
}
