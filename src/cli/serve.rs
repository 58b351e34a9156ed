//! `serve` command: run the bulk analytics HTTP service.

use crate::cli::{CampaignTotalArgs, CliError};
use crate::config::MAX_CONCURRENT_REQUESTS;
use crate::fetcher::instantly::InstantlyClient;
use crate::job::JobStore;
use crate::orchestrator::JobOrchestrator;
use crate::server::{self, AppState};
use crate::shutdown::SharedShutdown;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;

/// Upper bound on the per-wave fetch concurrency; anything higher just
/// converts into upstream 429s.
const MAX_CONCURRENCY: usize = 32;

/// Bulk campaign analytics service for Instantly workspaces
#[derive(Debug, Parser)]
#[command(name = "campaign-analytics-service", version, about)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Print a send summary for one campaign over a date range
    CampaignTotal(CampaignTotalArgs),
}

/// Arguments for the `serve` command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Concurrent upstream fetches per batch wave
    #[arg(long, default_value_t = MAX_CONCURRENT_REQUESTS, value_parser = parse_concurrency)]
    pub concurrency: usize,
}

/// Parse and validate a concurrency value.
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY {
        return Err(format!(
            "concurrency {value} exceeds maximum of {MAX_CONCURRENCY}"
        ));
    }
    Ok(value)
}

impl ServeArgs {
    /// Wire the store, client, and orchestrator together and serve until
    /// shutdown.
    pub async fn execute(&self, shutdown: SharedShutdown) -> Result<(), CliError> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CliError::InvalidArgument(format!("invalid bind address: {e}")))?;

        let store = JobStore::new();
        let client = Arc::new(InstantlyClient::new());
        let orchestrator = Arc::new(
            JobOrchestrator::new(store.clone(), client)
                .with_max_concurrency(self.concurrency)
                .with_shutdown(shutdown.clone()),
        );

        let state = AppState {
            orchestrator,
            store,
        };
        server::run_server(addr, state, shutdown).await?;
        Ok(())
    }
}
