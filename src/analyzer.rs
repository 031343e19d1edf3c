//! Usage Analysis Entry Point
//!
//! [`UsageAnalyzer`] performs one complete "compute now":
//!
//! 1. **Credentials**: reads the subscription tier and OAuth token from the Claude home
//! 2. **Budgets**: resolves tier ceilings plus local overrides
//! 3. **Remote**: fetches the authoritative snapshot when a token is available
//! 4. **Composition**: scans the local journals and builds the [`RateLimitInfo`]
//!
//! Only a missing projects directory fails the call. Missing credentials, override
//! files or remote data all degrade to local-only figures.
//!
//! Every call starts from scratch; nothing is cached between calls, so a scheduler can
//! invoke it repeatedly.
//!
//! ```rust,no_run
//! use claude_usage_meter::UsageAnalyzer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let analyzer = UsageAnalyzer::new(dirs::home_dir().unwrap().join(".claude"));
//! let info = analyzer.get_usage().await?;
//! println!("five-hour window at {}%", info.five_hour.percent);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::budget::BudgetResolver;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::UsageError;
use crate::models::{RateLimitInfo, RemoteUsageSnapshot};
use crate::rate_limit::RateLimitComposer;
#[cfg(feature = "remote")]
use crate::remote::RemoteUsageClient;

pub struct UsageAnalyzer {
    claude_home: PathBuf,
    remote_enabled: bool,
    tier_override: Option<String>,
    #[cfg(feature = "remote")]
    remote_client: RemoteUsageClient,
}

impl UsageAnalyzer {
    pub fn new(claude_home: impl Into<PathBuf>) -> Self {
        Self {
            claude_home: claude_home.into(),
            remote_enabled: true,
            tier_override: None,
            #[cfg(feature = "remote")]
            remote_client: RemoteUsageClient::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let analyzer = Self::new(config.paths.claude_home.clone()).with_remote(config.remote.enabled);

        #[cfg(feature = "remote")]
        let analyzer = analyzer.with_remote_client(
            RemoteUsageClient::new()
                .with_base_url(config.remote.base_url.clone())
                .with_timeout(config.remote_timeout()),
        );

        analyzer
    }

    pub fn with_remote(mut self, enabled: bool) -> Self {
        self.remote_enabled = enabled;
        self
    }

    /// Budget against this tier instead of the one in the credentials file
    pub fn with_tier(mut self, tier: Option<String>) -> Self {
        self.tier_override = tier;
        self
    }

    #[cfg(feature = "remote")]
    pub fn with_remote_client(mut self, client: RemoteUsageClient) -> Self {
        self.remote_client = client;
        self
    }

    pub fn claude_home(&self) -> &Path {
        &self.claude_home
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.claude_home.join("projects")
    }

    pub async fn get_usage(&self) -> Result<RateLimitInfo, UsageError> {
        let credentials = Credentials::load(&self.claude_home);
        let tier = self
            .tier_override
            .clone()
            .unwrap_or_else(|| credentials.tier.clone());
        let budgets = BudgetResolver::resolve_from_home(&tier, &self.claude_home);
        debug!(tier = %tier, ?budgets, "Resolved budgets");

        let remote = self.fetch_remote(credentials.access_token.as_deref()).await;

        let info = RateLimitComposer::new(self.projects_dir()).compose(
            &tier,
            &budgets,
            remote.as_ref(),
        )?;

        info!(
            tier = %info.tier_name,
            remote = info.remote_available,
            five_hour_percent = info.five_hour.percent,
            weekly_percent = info.weekly.percent,
            "Computed usage"
        );
        Ok(info)
    }

    async fn fetch_remote(&self, access_token: Option<&str>) -> Option<RemoteUsageSnapshot> {
        if !self.remote_enabled {
            return None;
        }
        let Some(access_token) = access_token else {
            debug!("No OAuth token, skipping remote usage");
            return None;
        };
        self.fetch_snapshot(access_token).await
    }

    #[cfg(feature = "remote")]
    async fn fetch_snapshot(&self, access_token: &str) -> Option<RemoteUsageSnapshot> {
        self.remote_client.fetch_best_effort(access_token).await
    }

    #[cfg(not(feature = "remote"))]
    async fn fetch_snapshot(&self, _access_token: &str) -> Option<RemoteUsageSnapshot> {
        None
    }
}
