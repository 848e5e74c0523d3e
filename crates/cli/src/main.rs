//! Refery CLI - regenerate, download and inspect the sitemap

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";
const SITEMAP_FILE_NAME: &str = "sitemap.xml";

#[derive(Parser)]
#[command(name = "refery")]
#[command(about = "Refery sitemap CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "REFERY_RPC_URL", default_value = DEFAULT_RPC_URL, global = true)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the sitemap; prints the XML unless --output is given
    Generate {
        /// File to write, or a directory to receive sitemap.xml
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show URL counts per category
    Stats,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct GenerateResult {
    xml: String,
    url_count: usize,
    generated_at: String,
    #[serde(default)]
    failed_sources: Vec<String>,
}

#[derive(Deserialize)]
struct StatsResult {
    total_urls: u64,
    static_pages: u64,
    job_listings: u64,
    referrer_profiles: u64,
    last_generated: String,
    #[serde(default)]
    failed_sources: Vec<String>,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "URLs")]
    urls: u64,
}

impl StatsResult {
    fn rows(&self) -> Vec<StatsRow> {
        vec![
            StatsRow {
                category: "Static pages",
                urls: self.static_pages,
            },
            StatsRow {
                category: "Job listings",
                urls: self.job_listings,
            },
            StatsRow {
                category: "Referrer profiles",
                urls: self.referrer_profiles,
            },
            StatsRow {
                category: "Total",
                urls: self.total_urls,
            },
        ]
    }
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// A directory (existing, or spelled with a trailing separator) receives `sitemap.xml`
fn resolve_output(path: &Path) -> PathBuf {
    let names_dir = path.as_os_str().to_string_lossy().ends_with(std::path::MAIN_SEPARATOR);
    if path.is_dir() || names_dir {
        path.join(SITEMAP_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

fn warn_failed_sources(failed: &[String]) {
    if !failed.is_empty() {
        eprintln!(
            "{} data unavailable for: {} (those URLs are missing)",
            "!".yellow().bold(),
            failed.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output } => {
            let value = call_rpc(&cli.rpc_url, "sitemap.generate.v1", json!([]))
                .await
                .context("Sitemap generation failed, please retry")?;
            let result: GenerateResult = serde_json::from_value(value)?;

            match output {
                Some(path) => {
                    let target = resolve_output(&path);
                    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&target, &result.xml)
                        .with_context(|| format!("Failed to write {}", target.display()))?;

                    eprintln!(
                        "{} {} URLs written to {} ({})",
                        "✓".green().bold(),
                        result.url_count,
                        target.display(),
                        result.generated_at
                    );
                }
                None => println!("{}", result.xml),
            }

            warn_failed_sources(&result.failed_sources);
        }

        Commands::Stats => {
            let value = call_rpc(&cli.rpc_url, "sitemap.stats.v1", json!([])).await?;
            let stats: StatsResult = serde_json::from_value(value)?;

            println!("{}", "Sitemap Statistics".bold());
            println!("{}", Table::new(stats.rows()));
            println!("  {} {}", "Last generated:".bold(), stats.last_generated);

            warn_failed_sources(&stats.failed_sources);
        }
    }

    Ok(())
}
