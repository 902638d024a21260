use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mailfinder_lib::ApiConfig;

/// Verify email addresses and search domains through the Hunter API.
///
/// The API key is read from HUNTER_API_KEY.
#[derive(Parser)]
#[command(name = "mailfinder-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human", global = true)]
    pub format: String,

    /// write report to file (JSON/NDJSON/CSV per --format)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// API base URL (overrides HUNTER_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// request timeout in seconds (overrides HUNTER_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// verify each address and cache its status
    Verify {
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// list the addresses known for each domain
    Search {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// run `<verb> <email|domain> [key]` operations, one per line
    Batch {
        /// read operations from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Environment configuration with the command-line overrides applied.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let mut config = ApiConfig::from_env().context("load API configuration")?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(secs) = self.timeout {
            if secs == 0 {
                bail!("--timeout must be at least 1 second");
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
