//! Main entry point for the campaign analytics service CLI.

use campaign_analytics_service::cli::{Cli, Commands};
use campaign_analytics_service::shutdown::ShutdownCoordinator;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting.
fn init_tracing() {
    // JSON output is requested via environment variable, not a flag, so the
    // same invocation works under both a supervisor and a terminal.
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("campaign_analytics_service=info,tower_http=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Ctrl+C drains the server and tells running jobs to stop issuing new
    // upstream fetches.
    let shutdown = ShutdownCoordinator::shared();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - shutting down");
                shutdown.request_shutdown();
            }
        }
    });

    let result = match cli.command {
        Commands::Serve(args) => args.execute(shutdown.clone()).await,
        Commands::CampaignTotal(args) => args.execute().await,
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
