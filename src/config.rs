//! Configuration system
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation and type safety
//!
//! Budget overrides are not part of this file; they live in the Claude home directory
//! (see [`crate::budget`]).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Paths configuration
    #[serde(default)]
    pub paths: PathsConfig,

    /// Remote usage endpoint configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Periodic refresh configuration
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub claude_home: PathBuf,
    pub log_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let claude_home = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude");
        Self {
            log_directory: claude_home.join("usage-meter-logs"),
            claude_home,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.anthropic.com".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            remote: RemoteConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

impl Config {
    /// Load configuration from environment, file, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // First existing file wins
        let config_paths = [
            PathBuf::from("claude-usage-meter.toml"),
            PathBuf::from(".claude-usage-meter.toml"),
            dirs::config_dir()
                .map(|d| d.join("claude-usage-meter").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // Path overrides
        if let Ok(val) = env::var("CLAUDE_HOME") {
            self.paths.claude_home = PathBuf::from(val);
        }
        if let Ok(val) = env::var("CLAUDE_USAGE_METER_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        // Remote overrides
        if let Ok(val) = env::var("CLAUDE_USAGE_METER_REMOTE") {
            self.remote.enabled = val
                .parse()
                .context("Invalid CLAUDE_USAGE_METER_REMOTE")?;
        }
        if let Ok(val) = env::var("CLAUDE_USAGE_METER_API_URL") {
            self.remote.base_url = val;
        }
        if let Ok(val) = env::var("CLAUDE_USAGE_METER_TIMEOUT_SECS") {
            self.remote.timeout_secs = val
                .parse()
                .context("Invalid CLAUDE_USAGE_METER_TIMEOUT_SECS")?;
        }

        // Refresh overrides
        if let Ok(val) = env::var("CLAUDE_USAGE_METER_REFRESH_SECS") {
            self.refresh.interval_secs = val
                .parse()
                .context("Invalid CLAUDE_USAGE_METER_REFRESH_SECS")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_uppercase().as_str()) {
            return Err(anyhow::anyhow!(
                "Log level must be one of {:?}, got {}",
                LOG_LEVELS,
                self.logging.level
            ));
        }

        if self.remote.timeout_secs == 0 || self.remote.timeout_secs > 60 {
            return Err(anyhow::anyhow!(
                "Remote timeout must be between 1 and 60 seconds, got {}",
                self.remote.timeout_secs
            ));
        }

        if self.refresh.interval_secs < 5 {
            return Err(anyhow::anyhow!(
                "Refresh interval must be at least 5 seconds, got {}",
                self.refresh.interval_secs
            ));
        }

        if !self.paths.claude_home.exists() {
            warn!(
                claude_home = %self.paths.claude_home.display(),
                "Claude home directory does not exist"
            );
        }

        Ok(())
    }

    /// Directory holding one subdirectory of session journals per project
    pub fn projects_dir(&self) -> PathBuf {
        self.paths.claude_home.join("projects")
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }
}

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid configuration, using defaults");
            Config::default()
        })
    })
}
