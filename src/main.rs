mod api;
mod cli_messages;
mod config;
mod consts;
mod context;
mod error;
mod logging;
mod session;
mod ui;
mod workspace;

use crate::api::{ApiClient, DataSource};
use crate::config::{Config, get_config_path};
use crate::context::Mode;
use crate::error::AppError;
use crate::logging::{get_rust_log_level, init_console_logger};
use crate::session::{Overrides, resolve_config, run_tui_mode, setup_session};
use crate::workspace::WorkspaceTable;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal dashboard for the Prometheus monitoring API
struct Args {
    /// Command to execute; runs the dashboard when omitted
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (defaults to ~/.prometheus/tui.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Monitoring API base URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Trading mode: LIVE, PAPER or BACKTEST
    #[arg(long, global = true, value_name = "MODE")]
    mode: Option<Mode>,

    #[arg(long, global = true, value_name = "MARKET_ID")]
    market: Option<String>,

    #[arg(long, global = true, value_name = "STRATEGY_ID")]
    strategy: Option<String>,

    #[arg(long, global = true, value_name = "PORTFOLIO_ID")]
    portfolio: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the monitoring API health endpoint
    Check,
    /// List the configured workspaces and their panels
    Workspaces,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            mode: self.mode,
            market: self.market.clone(),
            strategy: self.strategy.clone(),
            portfolio: self.portfolio.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_cmd_error!(e.title(), e.to_string().as_str());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_path().map_err(|e| AppError::Config(e.to_string()))?,
    };
    let config = resolve_config(&config_path, &args.overrides())?;

    match args.command {
        Some(Command::Check) => check(&config).await,
        Some(Command::Workspaces) => {
            list_workspaces(&config);
            Ok(())
        }
        None => {
            let console = init_console_logger(get_rust_log_level())?;
            let session = setup_session(config, console).await?;
            run_tui_mode(session).await
        }
    }
}

/// Reports whether the backend answers; an unreachable backend is a warning, not a failure.
async fn check(config: &Config) -> Result<(), AppError> {
    let client = ApiClient::new(config.api_url.clone())?;
    if client.health().await {
        print_cmd_success!("Backend reachable", "{}", client.base_url());
    } else {
        print_cmd_warn!("Backend not responding", "{}", client.base_url());
    }
    Ok(())
}

fn list_workspaces(config: &Config) {
    let table = match &config.workspaces {
        Some(entries) => WorkspaceTable::from_config(entries),
        None => WorkspaceTable::default(),
    };
    print_cmd_info!("Workspaces", "{} configured", table.len());
    for ws in table.iter() {
        let panels = ws
            .panels
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<12} {:<14} {}", ws.id, ws.name, panels);
    }
}
