//! Daemon configuration
//!
//! Layered: built-in defaults, then an optional TOML file (`refery.toml`, or
//! the path in `REFERY_CONFIG`), then `REFERY__<SECTION>__<KEY>` variables.

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use refery_api_rpc::server::{
    RpcServerConfig, DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_PER_SEC, DEFAULT_RPC_HOST,
    DEFAULT_RPC_PORT,
};
use refery_core::application::sitemap::constants::{DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT};
use refery_core::application::{SitemapConfig, MAX_PUBLISH_INTERVAL_MINUTES};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "refery.toml";
const DEFAULT_DB_PATH: &str = "~/.refery/refery.db";
const ENV_PREFIX: &str = "REFERY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub database: DatabaseConfig,
    pub rpc: RpcConfig,
    pub sitemap: SitemapSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite path or URL; `~` is expanded
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DB_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_PER_SEC,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapSettings {
    pub base_url: String,
    pub fetch_timeout_ms: u64,
    /// Directory receiving `sitemap.xml`; publishing is off when unset
    pub publish_dir: Option<PathBuf>,
    /// 0 publishes once at startup only
    pub publish_interval_minutes: u64,
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
            publish_dir: None,
            publish_interval_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write JSON logs to a daily-rolling file here
    pub dir: Option<PathBuf>,
}

impl DaemonConfig {
    /// Load from `REFERY_CONFIG` (or `refery.toml`) and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("REFERY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(env_source());

        Self::from_builder(builder).with_context(|| format!("loading configuration ({})", path))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: DaemonConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        self.sitemap_config()?;
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if self.sitemap.publish_interval_minutes > MAX_PUBLISH_INTERVAL_MINUTES {
            anyhow::bail!(
                "sitemap.publish_interval_minutes must be at most {}",
                MAX_PUBLISH_INTERVAL_MINUTES
            );
        }
        Ok(())
    }

    pub fn sitemap_config(&self) -> Result<SitemapConfig> {
        Ok(SitemapConfig::new(
            &self.sitemap.base_url,
            Duration::from_millis(self.sitemap.fetch_timeout_ms),
        )?)
    }

    /// Database path with `~` expanded
    pub fn database_path(&self) -> String {
        shellexpand::tilde(&self.database.url).into_owned()
    }

    pub fn rpc_server_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc.host.clone(),
            port: self.rpc.port,
            rate_limit_burst: self.rpc.rate_limit_burst,
            rate_limit_per_sec: self.rpc.rate_limit_per_sec,
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
