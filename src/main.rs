use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use claude_usage_meter::commands::run_watch;
use claude_usage_meter::config::get_config;
use claude_usage_meter::display::DisplayManager;
use claude_usage_meter::logging::init_logging;
use claude_usage_meter::UsageAnalyzer;

#[derive(Parser)]
#[command(name = "claude-usage-meter")]
#[command(about = "Estimate Claude subscription rate-limit usage from local session journals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Do not query the remote usage endpoint
    #[arg(long, global = true)]
    no_remote: bool,

    /// Budget against this tier instead of the one in the credentials file
    #[arg(long, global = true)]
    tier: Option<String>,

    /// Claude home directory (defaults to ~/.claude)
    #[arg(long, global = true)]
    claude_home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute usage once and print it
    Show,
    /// Recompute usage periodically until Ctrl+C
    Watch {
        /// Seconds between refreshes
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = get_config().clone();
    if let Some(claude_home) = cli.claude_home.clone() {
        config.paths.claude_home = claude_home;
    }
    if cli.no_remote {
        config.remote.enabled = false;
    }
    let _log_guard = init_logging(&config);

    let analyzer = UsageAnalyzer::from_config(&config).with_tier(cli.tier.clone());

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => match analyzer.get_usage().await {
            Ok(info) => {
                DisplayManager::new().display(&info, cli.json);
                Ok(())
            }
            Err(e) => handle_error(e.into(), cli.json),
        },
        Commands::Watch { interval } => {
            let period = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval());
            if period.is_zero() {
                return handle_error(anyhow::anyhow!("--interval must be positive"), cli.json);
            }
            match run_watch(&analyzer, period, cli.json).await {
                Ok(()) => Ok(()),
                Err(e) => handle_error(e, cli.json),
            }
        }
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("Error: {}", e);
    }
    process::exit(1);
}
