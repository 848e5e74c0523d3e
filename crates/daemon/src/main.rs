//! Refery Sitemap Daemon - Main Entry Point
//! Serves sitemap generation over JSON-RPC and optionally publishes to disk

mod config;
mod publish;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use refery_api_rpc::RpcServer;
use refery_core::application::{SitemapBuilder, SitemapPublisher};
use refery_core::port::time_provider::SystemTimeProvider;
use refery_infra_sqlite::{create_pool, run_migrations, SqliteListingSource};

use crate::config::DaemonConfig;
use crate::publish::FileSitemapSink;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration (before logging: the log directory is configurable)
    let config = DaemonConfig::load()?;

    // 2. Logging
    let _log_guard = telemetry::init_logging(&config.logging)?;
    info!("Refery sitemap daemon v{} starting...", VERSION);

    // 3. Database
    let db_path = config.database_path();
    ensure_parent_dir(&db_path)?;
    info!(db_path = %db_path, "Initializing database...");

    let pool = create_pool(&db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. DI wiring
    let sitemap_config = config.sitemap_config()?;
    info!(
        base_url = %sitemap_config.base_url,
        fetch_timeout_ms = sitemap_config.fetch_timeout.as_millis() as u64,
        "Sitemap builder configured"
    );
    let builder = Arc::new(SitemapBuilder::new(
        Arc::new(SqliteListingSource::new(pool.clone())),
        Arc::new(SystemTimeProvider),
        sitemap_config,
    ));

    // 5. JSON-RPC server
    let (rpc_addr, rpc_handle) = RpcServer::new(config.rpc_server_config(), builder.clone())
        .start()
        .await
        .context("RPC server start failed")?;

    // 6. Publisher (optional)
    let publisher_handle = match &config.sitemap.publish_dir {
        Some(dir) => {
            let sink = Arc::new(FileSitemapSink::new(dir));
            let interval = config.sitemap.publish_interval_minutes;
            let publisher = SitemapPublisher::new(builder.clone(), sink, interval);

            if interval == 0 {
                info!(dir = %dir.display(), "Publishing sitemap once");
                if let Err(e) = publisher.run_now().await {
                    error!(error = %e, "Initial sitemap publish failed");
                }
                None
            } else {
                info!(dir = %dir.display(), interval_minutes = interval, "Starting sitemap publisher");
                Some(tokio::spawn(publisher.run()))
            }
        }
        None => None,
    };

    info!(rpc_addr = %rpc_addr, "System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    if let Some(handle) = publisher_handle {
        handle.abort();
    }
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}

/// Create the directory holding a file-backed database
fn ensure_parent_dir(db_path: &str) -> Result<()> {
    let Some(path) = database_file(db_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

/// Filesystem path behind a SQLite URL or bare path; `None` for in-memory
fn database_file(db_path: &str) -> Option<&Path> {
    if db_path.contains(":memory:") || db_path.contains("mode=memory") {
        return None;
    }
    let path = db_path
        .strip_prefix("sqlite://")
        .or_else(|| db_path.strip_prefix("sqlite:"))
        .unwrap_or(db_path);
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    Some(Path::new(path))
}
