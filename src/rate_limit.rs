//! Rate Limit Composition
//!
//! Builds a [`RateLimitInfo`] from the local session journals and, when available, an
//! authoritative [`RemoteUsageSnapshot`].
//!
//! ## Windows
//!
//! | Window | Floor | Entries |
//! |---|---|---|
//! | five-hour | now - 5h | all models |
//! | weekly | now - 7d | all models |
//! | weekly Sonnet | now - 7d | models containing "sonnet" |
//!
//! Journals are scanned and parsed once against the weekly floor. All three windows are
//! reduced from that single entry collection.
//!
//! ## Percent and Reset
//!
//! `percent` is the window cost relative to its budget, clamped to 0-100 and rounded to
//! one decimal. The reset time is the oldest entry in the window plus the window length,
//! and is absent for an empty window.
//!
//! ## Remote Overlay
//!
//! A remote snapshot replaces `percent` and `reset_ts` field by field: each value the
//! snapshot provides wins, each value it leaves out keeps the local result. Token and
//! cost figures always come from the local journals.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::aggregator::{round_to, WindowAggregator};
use crate::budget::ResolvedBudgets;
use crate::error::UsageError;
use crate::file_discovery::FileDiscovery;
use crate::models::{
    RateLimitInfo, RemoteUsageSnapshot, RemoteWindowUsage, UsageEntry, UsageWindow,
    WindowRateInfo,
};
use crate::parser::JournalParser;
use crate::pricing::model_matches;
use crate::timestamp_parser::TimestampParser;

/// Model family tracked by the restricted weekly window.
pub const SONNET_FAMILY: &str = "sonnet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    FiveHour,
    Weekly,
    WeeklySonnet,
}

impl WindowKind {
    pub fn duration(self) -> Duration {
        match self {
            WindowKind::FiveHour => Duration::hours(5),
            WindowKind::Weekly | WindowKind::WeeklySonnet => Duration::days(7),
        }
    }
}

/// Cost as a percentage of budget, clamped to 0-100 and rounded to one decimal.
/// A budget that is not positive yields 0.
pub fn percent_of_budget(cost_usd: f64, budget_usd: f64) -> f64 {
    if budget_usd.is_nan() || budget_usd <= 0.0 {
        return 0.0;
    }
    round_to((cost_usd / budget_usd * 100.0).clamp(0.0, 100.0), 1)
}

pub struct RateLimitComposer {
    projects_dir: PathBuf,
}

impl RateLimitComposer {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    pub fn compose(
        &self,
        tier: &str,
        budgets: &ResolvedBudgets,
        remote: Option<&RemoteUsageSnapshot>,
    ) -> Result<RateLimitInfo, UsageError> {
        self.compose_at(Utc::now(), tier, budgets, remote)
    }

    /// Compose against an explicit "now". Pure with respect to `now` and the journals
    /// on disk.
    #[instrument(skip(self, budgets, remote), fields(projects_dir = %self.projects_dir.display()))]
    pub fn compose_at(
        &self,
        now: DateTime<Utc>,
        tier: &str,
        budgets: &ResolvedBudgets,
        remote: Option<&RemoteUsageSnapshot>,
    ) -> Result<RateLimitInfo, UsageError> {
        if !self.projects_dir.exists() {
            return Err(UsageError::DirectoryNotFound(self.projects_dir.clone()));
        }

        let week_floor = now - WindowKind::Weekly.duration();
        let five_hour_floor = now - WindowKind::FiveHour.duration();

        let entries = self.load_entries(week_floor);

        let five_hour = WindowAggregator::aggregate(&entries, five_hour_floor);
        let weekly = WindowAggregator::aggregate(&entries, week_floor);
        let weekly_sonnet = WindowAggregator::aggregate(
            entries.iter().filter(|e| model_matches(&e.model, SONNET_FAMILY)),
            week_floor,
        );

        debug!(
            entries = entries.len(),
            five_hour_cost = five_hour.total_cost_usd,
            weekly_cost = weekly.total_cost_usd,
            weekly_sonnet_cost = weekly_sonnet.total_cost_usd,
            "Aggregated usage windows"
        );

        let mut info = RateLimitInfo {
            tier_name: tier.to_string(),
            five_hour: Self::rate_info(five_hour, budgets.five_hour, WindowKind::FiveHour),
            weekly: Self::rate_info(weekly, budgets.weekly, WindowKind::Weekly),
            weekly_sonnet: Self::rate_info(
                weekly_sonnet,
                budgets.weekly_sonnet,
                WindowKind::WeeklySonnet,
            ),
            remote_available: false,
            remote_status: None,
        };

        if let Some(snapshot) = remote {
            Self::apply_remote(&mut info, snapshot);
        }

        Ok(info)
    }

    /// Single I/O pass: every journal modified at or after `since`, parsed against the
    /// same floor.
    pub fn load_entries(&self, since: DateTime<Utc>) -> Vec<UsageEntry> {
        FileDiscovery::scan(&self.projects_dir, since)
            .iter()
            .flat_map(|path| JournalParser::parse_file(path, since))
            .collect()
    }

    fn rate_info(window: UsageWindow, budget_usd: f64, kind: WindowKind) -> WindowRateInfo {
        let reset_ts = window
            .oldest_entry
            .map(|oldest| TimestampParser::format(&(oldest + kind.duration())));

        WindowRateInfo {
            budget_usd,
            cost_usd: window.total_cost_usd,
            percent: percent_of_budget(window.total_cost_usd, budget_usd),
            reset_ts,
            window,
        }
    }

    pub fn apply_remote(info: &mut RateLimitInfo, snapshot: &RemoteUsageSnapshot) {
        info.remote_available = true;
        Self::overlay_window(&mut info.five_hour, snapshot.five_hour.as_ref());
        Self::overlay_window(&mut info.weekly, snapshot.seven_day.as_ref());
        Self::overlay_window(&mut info.weekly_sonnet, snapshot.seven_day_sonnet.as_ref());
    }

    fn overlay_window(target: &mut WindowRateInfo, remote: Option<&RemoteWindowUsage>) {
        let Some(remote) = remote else {
            return;
        };
        if let Some(utilization) = remote.utilization {
            target.percent = utilization;
        }
        if let Some(resets_at) = &remote.resets_at {
            target.reset_ts = Some(resets_at.clone());
        }
    }
}
