//! JSON-RPC Server
//!
//! TCP on a configurable host; defaults to localhost only.

use crate::handler::RpcHandler;
use crate::rate_limiter::RateLimiter;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use refery_core::application::SitemapBuilder;
use refery_core::error::{AppError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
pub const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 5;

pub const METHOD_GENERATE: &str = "sitemap.generate.v1";
pub const METHOD_STATS: &str = "sitemap.stats.v1";

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 picks a free port (see the address returned by `start`)
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_PER_SEC,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, builder: Arc<SitemapBuilder>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_burst, config.rate_limit_per_sec);
        Self {
            config,
            handler: Arc::new(RpcHandler::new(builder, rate_limiter)),
        }
    }

    /// Bind and start serving; returns the bound address and the server handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(format!("No local address: {}", e)))?;

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_GENERATE, move |_, _, _| {
                let handler = handler.clone();
                async move { handler.generate().await }
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_STATS, move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;

        info!(
            addr = %local_addr,
            rate_limit_burst = self.config.rate_limit_burst,
            rate_limit_per_sec = self.config.rate_limit_per_sec,
            "JSON-RPC server started"
        );

        Ok((local_addr, server.start(module)))
    }
}
