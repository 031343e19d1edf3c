//! Per-tier budget ceilings.
//!
//! Each subscription tier has default USD ceilings for the five-hour, weekly and
//! weekly-Sonnet windows. A local override file (`usage-meter-config.json` in the Claude
//! home directory) may replace any subset of them.
//!
//! ```json
//! { "budget_overrides": { "five_hour": 25.0, "weekly_sonnet": 40.0 } }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const OVERRIDES_FILE_NAME: &str = "usage-meter-config.json";

pub const TIER_PRO: &str = "default_claude_pro";
pub const TIER_MAX_5X: &str = "default_claude_max_5x";
pub const TIER_MAX_20X: &str = "default_claude_max_20x";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBudgets {
    pub five_hour: f64,
    pub weekly: f64,
    pub weekly_sonnet: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverrides {
    #[serde(default)]
    pub five_hour: Option<f64>,
    #[serde(default)]
    pub weekly: Option<f64>,
    #[serde(default)]
    pub weekly_sonnet: Option<f64>,
}

/// Contents of the local override file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub budget_overrides: Option<BudgetOverrides>,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read budget overrides: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse budget overrides: {}", path.display()))
    }

    /// Load `usage-meter-config.json` from the Claude home directory. A missing or
    /// malformed file means no overrides.
    pub fn load(claude_home: &Path) -> Self {
        let path = claude_home.join(OVERRIDES_FILE_NAME);
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded budget overrides");
                config
            }
            Err(e) => {
                debug!(error = %e, "Ignoring budget overrides");
                Self::default()
            }
        }
    }
}

pub struct BudgetResolver;

impl BudgetResolver {
    /// Default ceilings for a tier. Unrecognised tiers get the Pro ceilings.
    pub fn tier_defaults(tier: &str) -> ResolvedBudgets {
        let (five_hour, weekly, weekly_sonnet) = match tier {
            TIER_MAX_5X => (93.0, 1090.0, 160.0),
            TIER_MAX_20X => (372.0, 4360.0, 640.0),
            _ => (18.6, 218.0, 32.0),
        };

        ResolvedBudgets {
            five_hour,
            weekly,
            weekly_sonnet,
        }
    }

    pub fn resolve(tier: &str, overrides: Option<&BudgetOverrides>) -> ResolvedBudgets {
        let mut budgets = Self::tier_defaults(tier);

        if let Some(overrides) = overrides {
            if let Some(five_hour) = overrides.five_hour {
                budgets.five_hour = five_hour;
            }
            if let Some(weekly) = overrides.weekly {
                budgets.weekly = weekly;
            }
            if let Some(weekly_sonnet) = overrides.weekly_sonnet {
                budgets.weekly_sonnet = weekly_sonnet;
            }
        }

        budgets
    }

    /// Resolve against the override file in `claude_home`.
    pub fn resolve_from_home(tier: &str, claude_home: &Path) -> ResolvedBudgets {
        let app_config = AppConfig::load(claude_home);
        Self::resolve(tier, app_config.budget_overrides.as_ref())
    }
}
