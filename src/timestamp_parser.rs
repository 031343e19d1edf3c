use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Handles the RFC 3339 timestamps found in journals and emitted in reports
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a journal timestamp into a DateTime<Utc>
    /// Accepts fractional seconds (`...:00.123456Z`) as well as whole seconds (`...:00Z`)
    /// and any explicit offset. Timestamps without a zone are rejected.
    pub fn parse(timestamp_str: &str) -> Result<DateTime<Utc>> {
        let timestamp_str = timestamp_str.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp_str) {
            return Ok(dt.with_timezone(&Utc));
        }

        anyhow::bail!("Failed to parse timestamp: {}", timestamp_str)
    }

    /// Format as RFC 3339 in UTC, truncated to whole seconds, e.g. `2025-01-01T12:00:00Z`
    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// serde helper: optional timestamps serialize as second-precision strings or `null`
pub fn serialize_opt<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_some(&TimestampParser::format(dt)),
        None => serializer.serialize_none(),
    }
}
