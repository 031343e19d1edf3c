//! Claude Usage Meter Library
//!
//! Estimates how much of a Claude subscription's rate-limit budget has been consumed in
//! the rolling five-hour and seven-day windows. Figures are derived from the session
//! journals Claude Code writes under `~/.claude/projects/`, and are replaced by the
//! authoritative numbers from the Anthropic usage endpoint whenever those are available.
//!
//! ## Core Features
//!
//! - **Journal scanning**: Finds recently modified `*.jsonl` session shards and extracts
//!   assistant usage records, skipping anything malformed
//! - **Window aggregation**: Per-window token totals, per-model breakdown and USD cost
//! - **Budgets by tier**: Tier defaults with optional local overrides
//! - **Remote overlay**: Remote utilization and reset times win field by field
//! - **Flexible output**: Colored terminal text or JSON
//!
//! ## Architecture Overview
//!
//! - [`file_discovery`] - Shard discovery with a modification-time floor
//! - [`parser`] - Line-oriented journal parsing
//! - [`pricing`] - Model family price table
//! - [`aggregator`] - Folding entries into a [`UsageWindow`]
//! - [`rate_limit`] - Building the three windows and overlaying remote data
//! - [`budget`] / [`credentials`] - Tier and budget resolution from the Claude home
//! - `remote` - OAuth usage endpoint client (feature `remote`)
//! - [`analyzer`] - One complete "compute now"
//! - [`display`] - Terminal and JSON output
//! - [`config`] / [`logging`] - Ambient configuration and tracing setup
//!
//! ## Main Entry Point
//!
//! ```rust,no_run
//! use claude_usage_meter::UsageAnalyzer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = claude_usage_meter::config::get_config();
//! let info = UsageAnalyzer::from_config(config).get_usage().await?;
//! println!("{}", serde_json::to_string_pretty(&info)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod budget;
pub mod config;
pub mod credentials;
pub mod display;
pub mod error;
pub mod file_discovery;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pricing;
pub mod rate_limit;
#[cfg(feature = "remote")]
pub mod remote;
pub mod timestamp_parser;

// Command modules
pub mod commands;

pub use analyzer::UsageAnalyzer;
pub use error::UsageError;
pub use models::*;
pub use rate_limit::RateLimitComposer;
