//! findash: financial statement dashboard for one ticker.
//!
//! Usage:
//!   findash AAPL
//!   findash msft --year 2022
//!   findash AAPL --json
//!   findash AAPL --export ./out     # writes ./out/AAPL_financial_data/*.csv
//!
//! Requires FMP_API_KEY and ALPHA_VANTAGE_API_KEY (a `.env` file is read).

mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dashboard_core::{DashboardConfig, DashboardError, Symbol};
use dashboard_export::Workbook;
use dashboard_orchestrator::{DashboardOrchestrator, DashboardRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "findash", about = "Financial statement dashboard for a single ticker")]
struct Cli {
    /// Ticker symbol (e.g., AAPL).
    symbol: String,

    /// Write the dashboard as CSV sheets under this directory.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the snapshot as JSON instead of the text dashboard.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Income statement year to show. Defaults to the latest reported.
    #[arg(long)]
    year: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<DashboardError>() {
            Some(err) => {
                tracing::error!("{}", err);
                eprintln!("{}", err.user_message());
            }
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG_FORMAT=json`
/// switches to structured logs.
fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "findash=info,dashboard_orchestrator=info,market_data_client=warn".into()
        })
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let symbol = Symbol::parse(&cli.symbol)?;
    let config = DashboardConfig::from_env()?;
    tracing::debug!("Config: {:?}", config);

    let orchestrator = DashboardOrchestrator::new(&config);
    let snapshot = orchestrator.load(DashboardRequest::new(symbol.clone())).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        println!("{}", json);
    } else {
        print!("{}", render::render(&snapshot, cli.year.as_deref()));
    }

    if snapshot.is_empty() {
        bail!("no data available for {}", symbol);
    }

    if let Some(parent) = cli.export {
        let dir = Workbook::from_snapshot(&snapshot)?.write_dir(&parent, &symbol)?;
        println!("Exported to {}", dir.display());
    }

    Ok(())
}
