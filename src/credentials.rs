//! Claude OAuth credentials.
//!
//! The Claude CLI stores its OAuth session in `~/.claude/.credentials.json`:
//!
//! ```json
//! {
//!   "claudeAiOauth": {
//!     "accessToken": "...",
//!     "rateLimitTier": "default_claude_max_5x"
//!   }
//! }
//! ```
//!
//! Only the tier name and the access token are read. Neither is required: a missing
//! file degrades to the `"unknown"` tier and local-only usage.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CREDENTIALS_FILE_NAME: &str = ".credentials.json";

pub const UNKNOWN_TIER: &str = "unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsFile {
    #[serde(default)]
    pub claude_ai_oauth: Option<OAuthCredentials>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCredentials {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub rate_limit_tier: Option<String>,
}

/// What the meter needs from the credentials file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tier: String,
    pub access_token: Option<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            tier: UNKNOWN_TIER.to_string(),
            access_token: None,
        }
    }
}

impl Credentials {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials: {}", path.display()))?;
        let file: CredentialsFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse credentials: {}", path.display()))?;

        let oauth = file.claude_ai_oauth.unwrap_or_default();
        let tier = oauth
            .rate_limit_tier
            .filter(|tier| !tier.is_empty())
            .unwrap_or_else(|| UNKNOWN_TIER.to_string());
        let access_token = oauth.access_token.filter(|token| !token.is_empty());

        Ok(Self { tier, access_token })
    }

    /// Read credentials from the Claude home directory, falling back to defaults
    pub fn load(claude_home: &Path) -> Self {
        match Self::load_from_file(&claude_home.join(CREDENTIALS_FILE_NAME)) {
            Ok(credentials) => credentials,
            Err(e) => {
                debug!(error = %e, "No usable Claude credentials");
                Self::default()
            }
        }
    }
}
