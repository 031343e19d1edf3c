//! Remote usage client.
//!
//! Fetches the authoritative rate-limit utilization for the signed-in account from the
//! Anthropic OAuth usage endpoint.
//!
//! ```text
//! GET https://api.anthropic.com/api/oauth/usage
//! Authorization: Bearer <access_token>
//! anthropic-beta: oauth-2025-04-20
//! ```
//!
//! ```json
//! {
//!   "five_hour": {"utilization": 25.0, "resets_at": "2025-01-01T12:00:00Z"},
//!   "seven_day": {"utilization": 45.0, "resets_at": "2025-01-05T00:00:00Z"},
//!   "seven_day_sonnet": null,
//!   "extra_usage": {"is_enabled": false}
//! }
//! ```
//!
//! The fetch is best-effort. Any failure (network, timeout, non-200 status, bad body)
//! leaves the caller with local-only figures.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::RemoteUsageSnapshot;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub const USAGE_ENDPOINT: &str = "/api/oauth/usage";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const ANTHROPIC_BETA: &str = "oauth-2025-04-20";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct RemoteUsageClient {
    base_url: String,
    timeout: Duration,
}

impl Default for RemoteUsageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteUsageClient {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn usage_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), USAGE_ENDPOINT)
    }

    #[instrument(skip(self, access_token))]
    pub async fn fetch(&self, access_token: &str) -> Result<RemoteUsageSnapshot> {
        let url = self.usage_url();
        debug!(url = %url, "Fetching remote usage");

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .header("anthropic-beta", ANTHROPIC_BETA)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .with_context(|| format!("Usage request to {} failed", url))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            anyhow::bail!("Usage API returned status {}", status.as_u16());
        }

        response
            .json::<RemoteUsageSnapshot>()
            .await
            .context("Failed to decode usage response")
    }

    /// Like [`fetch`](Self::fetch) but any failure becomes `None`.
    pub async fn fetch_best_effort(&self, access_token: &str) -> Option<RemoteUsageSnapshot> {
        match self.fetch(access_token).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(error = %e, "Remote usage unavailable, using local figures");
                None
            }
        }
    }
}
