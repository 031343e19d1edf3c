//! Output Formatting and Display Management
//!
//! Renders a [`RateLimitInfo`] either as colored terminal text or as pretty JSON.
//!
//! ## Terminal Output
//!
//! One line per window with a progress bar, the spend against the budget and the time
//! until the window resets, followed by the per-model breakdown of the weekly window:
//!
//! ```text
//! ================================================================================
//! Claude Usage Meter - default_claude_max_5x (remote)
//! ================================================================================
//!
//! ⏱  5-hour         [██████░░░░░░░░░░░░░░]  32.0%   $29.76 / $93.00   resets in 2h 13m
//! 📅 Weekly         [███░░░░░░░░░░░░░░░░░]  14.5%  $158.05 / $1090.00 resets in 4d 6h
//! 🎵 Weekly Sonnet  [█░░░░░░░░░░░░░░░░░░░]   5.1%    $8.20 / $160.00  resets in 4d 6h
//! ```
//!
//! ## JSON Output
//!
//! The JSON form is the serialized [`RateLimitInfo`]; absent optional fields are
//! emitted as `null`.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

use crate::models::{RateLimitInfo, UsageWindow, WindowRateInfo};
use crate::timestamp_parser::TimestampParser;

const BAR_WIDTH: usize = 20;

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    pub fn display(&self, info: &RateLimitInfo, json_output: bool) {
        if json_output {
            match self.render_json(info) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing usage to JSON: {}", e),
            }
            return;
        }

        print!("{}", self.render_text(info, Utc::now()));
    }

    pub fn render_json(&self, info: &RateLimitInfo) -> serde_json::Result<String> {
        serde_json::to_string_pretty(info)
    }

    pub fn render_text(&self, info: &RateLimitInfo, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        let source = if info.remote_available {
            "remote"
        } else {
            "local estimate"
        };

        out.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
        out.push_str(&format!(
            "{}\n",
            format!("Claude Usage Meter - {} ({})", info.tier_name, source)
                .bright_white()
                .bold()
        ));
        out.push_str(&format!("{}\n\n", "=".repeat(80).bright_cyan()));

        out.push_str(&self.window_line("⏱ ", "5-hour", &info.five_hour, now));
        out.push_str(&self.window_line("📅", "Weekly", &info.weekly, now));
        out.push_str(&self.window_line("🎵", "Weekly Sonnet", &info.weekly_sonnet, now));

        if !info.weekly.window.by_model.is_empty() {
            out.push_str(&format!("\n{} Weekly spend by model:\n", "📊".bright_yellow()));
            out.push_str(&self.model_breakdown(&info.weekly.window));
        }

        if let Some(status) = &info.remote_status {
            out.push_str(&format!("\n{} {}\n", "ℹ️ ".bright_blue(), status));
        }

        out
    }

    fn window_line(
        &self,
        icon: &str,
        label: &str,
        rate: &WindowRateInfo,
        now: DateTime<Utc>,
    ) -> String {
        format!(
            "{} {:<14} {} {:>6}  {} / {}  {}\n",
            icon,
            label.bright_white().bold(),
            progress_bar(rate.percent, BAR_WIDTH),
            colorize_percent(rate.percent),
            format!("${:.2}", rate.cost_usd).bright_green(),
            format!("${:.2}", rate.budget_usd).bright_white(),
            format_reset(rate.reset_ts.as_deref(), now).dimmed()
        )
    }

    fn model_breakdown(&self, window: &UsageWindow) -> String {
        let mut models: Vec<_> = window.by_model.iter().collect();
        models.sort_by(|a, b| b.1.cost_usd.total_cmp(&a.1.cost_usd));

        models
            .into_iter()
            .map(|(model, usage)| {
                format!(
                    "   {}: {} ({} tokens)\n",
                    model.bright_cyan(),
                    format!("${:.2}", usage.cost_usd).bright_green(),
                    usage.tokens.total().to_string().bright_white()
                )
            })
            .collect()
    }
}

fn colorize_percent(percent: f64) -> ColoredString {
    let text = format!("{:.1}%", percent);
    if percent >= 90.0 {
        text.bright_red().bold()
    } else if percent >= 70.0 {
        text.bright_yellow()
    } else {
        text.bright_green()
    }
}

/// Fixed-width bar; `percent` is clamped to 0..=100.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let fraction = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0) / 100.0
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Human description of a reset time relative to `now`.
///
/// Text that does not parse as a timestamp is shown as-is.
pub fn format_reset(reset_ts: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(reset_ts) = reset_ts else {
        return "no activity".to_string();
    };
    let Ok(reset) = TimestampParser::parse(reset_ts) else {
        return format!("resets {}", reset_ts);
    };

    let remaining = reset.signed_duration_since(now);
    if remaining.num_seconds() <= 0 {
        return "resetting".to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;
    if days > 0 {
        format!("resets in {}d {}h", days, hours)
    } else if hours > 0 {
        format!("resets in {}h {}m", hours, minutes)
    } else {
        format!("resets in {}m", minutes.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelUsage, TokenCounts};
    use chrono::{Duration, TimeZone};

    fn window_info(budget: f64, cost: f64, percent: f64, reset: Option<&str>) -> WindowRateInfo {
        WindowRateInfo {
            budget_usd: budget,
            cost_usd: cost,
            percent,
            reset_ts: reset.map(str::to_string),
            window: UsageWindow::default(),
        }
    }

    fn sample_info() -> RateLimitInfo {
        let mut weekly = window_info(1090.0, 158.05, 14.5, Some("2025-01-05T00:00:00Z"));
        weekly.window.by_model.insert(
            "claude-sonnet-4".to_string(),
            ModelUsage {
                tokens: TokenCounts {
                    input_tokens: 1000,
                    output_tokens: 500,
                    ..Default::default()
                },
                cost_usd: 8.2,
            },
        );

        RateLimitInfo {
            tier_name: "default_claude_max_5x".to_string(),
            five_hour: window_info(93.0, 29.76, 32.0, Some("2025-01-01T14:13:00Z")),
            weekly,
            weekly_sonnet: window_info(160.0, 8.2, 5.1, None),
            remote_available: false,
            remote_status: None,
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[░░░░]");
        assert_eq!(progress_bar(50.0, 4), "[██░░]");
        assert_eq!(progress_bar(100.0, 4), "[████]");
        assert_eq!(progress_bar(250.0, 4), "[████]");
        assert_eq!(progress_bar(f64::NAN, 4), "[░░░░]");
    }

    #[test]
    fn test_format_reset() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(format_reset(None, now), "no activity");
        assert_eq!(
            format_reset(Some("2025-01-01T14:13:00Z"), now),
            "resets in 2h 13m"
        );
        assert_eq!(
            format_reset(Some("2025-01-05T18:00:00+00:00"), now),
            "resets in 4d 6h"
        );
        assert_eq!(format_reset(Some("2025-01-01T12:00:30Z"), now), "resets in 1m");
        assert_eq!(
            format_reset(Some(&(now - Duration::minutes(5)).to_rfc3339()), now),
            "resetting"
        );
        assert_eq!(format_reset(Some("soon"), now), "resets soon");
    }

    #[test]
    fn test_render_text_mentions_every_window() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let text = DisplayManager::new().render_text(&sample_info(), now);

        assert!(text.contains("default_claude_max_5x"));
        assert!(text.contains("local estimate"));
        assert!(text.contains("5-hour"));
        assert!(text.contains("Weekly Sonnet"));
        assert!(text.contains("$29.76"));
        assert!(text.contains("claude-sonnet-4"));
        assert!(text.contains("resets in 2h 13m"));
        assert!(text.contains("no activity"));
    }

    #[test]
    fn test_render_json_field_names() {
        let json = DisplayManager::new().render_json(&sample_info()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tier_name"], "default_claude_max_5x");
        assert_eq!(value["api_available"], false);
        assert!(value["rate_limit_status"].is_null());
        assert!(value["weekly_sonnet"]["reset_ts"].is_null());
        assert_eq!(value["five_hour"]["budget_usd"], 93.0);
        assert!(value["weekly"]["window"]["by_model"]["claude-sonnet-4"].is_object());
    }
}
