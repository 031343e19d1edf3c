//! Core Data Models
//!
//! This module defines the data structures used throughout the usage meter, from raw
//! journal lines to the rate-limit report handed to the presentation layer.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`JournalRecord`] - One decoded line of a session journal
//! 2. **Normalized**: [`UsageEntry`] - An assistant turn with its model, timestamp and tokens
//! 3. **Aggregation**: [`UsageWindow`] - Totals over every entry at or after a time floor
//! 4. **Output**: [`WindowRateInfo`], [`RateLimitInfo`] - Budget-relative view of each window
//!
//! ## Remote Data
//!
//! - [`RemoteUsageSnapshot`] - Authoritative utilization for up to three windows, as
//!   returned by the OAuth usage endpoint
//!
//! ## Output Compatibility
//!
//! The serialized field names of the output types are consumed by existing front ends.
//! Optional fields are always emitted and serialize as `null` when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::timestamp_parser;

/// One line of a session journal. Only `assistant` records carry usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    #[serde(rename = "type", default)]
    pub entry_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<MessageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<UsageData>,
}

/// Token counters as written by the assistant. Any of them may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageData {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
}

/// A normalized assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEntry {
    pub model: String,
    pub timestamp: DateTime<Utc>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_create_tokens: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_create_tokens: u64,
}

impl TokenCounts {
    pub fn add_entry(&mut self, entry: &UsageEntry) {
        self.input_tokens = self.input_tokens.saturating_add(entry.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(entry.output_tokens);
        self.cache_read_tokens = self.cache_read_tokens.saturating_add(entry.cache_read_tokens);
        self.cache_create_tokens = self
            .cache_create_tokens
            .saturating_add(entry.cache_create_tokens);
    }

    /// Sum of all four counters, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_read_tokens)
            .saturating_add(self.cache_create_tokens)
    }
}

/// Per-model slice of a window. Costs here are not rounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub tokens: TokenCounts,
    pub cost_usd: f64,
}

/// Aggregate over all entries at or after a time floor.
///
/// The per-model token counters always sum to the window totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageWindow {
    /// Rounded to three decimal places.
    pub total_cost_usd: f64,
    #[serde(flatten)]
    pub tokens: TokenCounts,
    pub by_model: BTreeMap<String, ModelUsage>,
    #[serde(rename = "oldest_entry_ts", serialize_with = "timestamp_parser::serialize_opt")]
    pub oldest_entry: Option<DateTime<Utc>>,
    #[serde(rename = "newest_entry_ts", serialize_with = "timestamp_parser::serialize_opt")]
    pub newest_entry: Option<DateTime<Utc>>,
    pub entry_count: u64,
}

impl UsageWindow {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRateInfo {
    pub budget_usd: f64,
    pub cost_usd: f64,
    /// 0-100, one decimal place unless supplied by the remote snapshot.
    pub percent: f64,
    /// Kept as text so a remote reset time passes through unchanged.
    pub reset_ts: Option<String>,
    pub window: UsageWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitInfo {
    pub tier_name: String,
    pub five_hour: WindowRateInfo,
    pub weekly: WindowRateInfo,
    pub weekly_sonnet: WindowRateInfo,
    #[serde(rename = "api_available")]
    pub remote_available: bool,
    #[serde(rename = "rate_limit_status")]
    pub remote_status: Option<String>,
}

/// Utilization of one window as reported by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteWindowUsage {
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub resets_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraUsage {
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub monthly_limit: Option<f64>,
    #[serde(default)]
    pub used_credits: Option<f64>,
    #[serde(default)]
    pub utilization: Option<f64>,
}

/// Authoritative usage view. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteUsageSnapshot {
    #[serde(default)]
    pub five_hour: Option<RemoteWindowUsage>,
    #[serde(default)]
    pub seven_day: Option<RemoteWindowUsage>,
    #[serde(default)]
    pub seven_day_sonnet: Option<RemoteWindowUsage>,
    #[serde(default)]
    pub extra_usage: Option<ExtraUsage>,
}
