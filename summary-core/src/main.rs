use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use summary_core::observability::{setup_logging, MetricsCollector};
use summary_core::server::{self, AppState, UPSTREAM_FAILURE_PREFIX};
use summary_core::storage::SystemClock;
use summary_core::{Config, SummaryAggregator};
use tracing::info;

#[derive(Parser)]
#[command(name = "summaryd")]
#[command(about = "Customer summary aggregation service", version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = summary_core::config::CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Build one summary and print it as JSON
    Fetch {
        customer_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    setup_logging(&config.logging);

    let metrics = MetricsCollector::new().context("Failed to register metrics")?;
    let aggregator = SummaryAggregator::from_config(&config, Arc::new(SystemClock), metrics.clone())
        .context("Failed to initialize aggregator")?;

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            info!(bind = %bind, ttl_secs = config.cache.ttl_secs, "Starting summary service");
            server::serve(&bind, AppState::new(Arc::new(aggregator), metrics)).await?;
        }
        Command::Fetch { customer_id } => match aggregator.summary(&customer_id).await {
            Ok(summary) => println!("{}", serde_json::to_string_pretty(&*summary)?),
            Err(e) if e.is_upstream_abort() => {
                eprintln!("{}{}", UPSTREAM_FAILURE_PREFIX, e);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
