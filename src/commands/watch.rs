//! Watch command implementation
//!
//! Recomputes usage on a fixed interval and prints each result until Ctrl+C. Every
//! tick is an independent analyzer call; a failed tick is reported and the loop
//! carries on.

use anyhow::Result;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::analyzer::UsageAnalyzer;
use crate::display::DisplayManager;

/// Run the refresh loop until interrupted
pub async fn run_watch(analyzer: &UsageAnalyzer, period: Duration, json_output: bool) -> Result<()> {
    run_watch_until(analyzer, period, json_output, tokio::signal::ctrl_c()).await
}

/// Run the refresh loop until `shutdown` resolves
///
/// `shutdown` is polled for the whole run, including while a refresh is in flight.
pub async fn run_watch_until<F>(
    analyzer: &UsageAnalyzer,
    period: Duration,
    json_output: bool,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    if !json_output {
        println!("🔄 Refreshing every {}s, press Ctrl+C to exit", period.as_secs());
    }
    info!(interval_secs = period.as_secs(), "Starting watch mode");

    let display = DisplayManager::new();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            _ = ticker.tick() => {
                tokio::select! {
                    result = &mut shutdown => {
                        result?;
                        break;
                    }
                    _ = refresh_once(analyzer, &display, json_output) => {}
                }
            }
        }
    }

    info!("Watch mode stopped");
    Ok(())
}

async fn refresh_once(analyzer: &UsageAnalyzer, display: &DisplayManager, json_output: bool) {
    match analyzer.get_usage().await {
        Ok(info) => display.display(&info, json_output),
        Err(e) => {
            error!(error = %e, "Usage refresh failed");
            if json_output {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("❌ {}", e);
            }
        }
    }
}
