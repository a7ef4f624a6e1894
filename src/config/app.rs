//! Main application configuration
//!
//! Settings are read from a TOML file or from environment variables, with
//! defaults for everything. Command-line flags are applied on top by the
//! binary.

use crate::rating::EloConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: EloConfig,
    pub storage: StorageSettings,
    pub feed: FeedSettings,
    pub replay: ReplaySettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where ratings and the processed-day ledger live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON store file
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Directory of `YYYY-MM-DD.json` scoreboard snapshots
    pub scoreboard_dir: PathBuf,
    /// Saved Odds API response used to annotate picks
    pub odds_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// Pause between days during a rebuild, in milliseconds
    pub per_day_delay_ms: u64,
    /// Number of picks returned by a prediction run
    pub pick_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "courtside-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/ratings.json"),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            scoreboard_dir: PathBuf::from("data/scoreboards"),
            odds_path: None,
        }
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            per_day_delay_ms: 250,
            pick_limit: 5,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still
    /// override what the file sets.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(base) = env::var("BASE_RATING") {
            self.rating.base_rating = base
                .parse()
                .map_err(|_| anyhow!("Invalid BASE_RATING value: {}", base))?;
        }
        if let Ok(k) = env::var("K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k))?;
        }
        if let Ok(adv) = env::var("HOME_ADVANTAGE") {
            self.rating.home_advantage = adv
                .parse()
                .map_err(|_| anyhow!("Invalid HOME_ADVANTAGE value: {}", adv))?;
        }

        // Storage and feed
        if let Ok(path) = env::var("STORE_PATH") {
            self.storage.store_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("SCOREBOARD_DIR") {
            self.feed.scoreboard_dir = PathBuf::from(dir);
        }

        // Replay settings
        if let Ok(delay) = env::var("REPLAY_DELAY_MS") {
            self.replay.per_day_delay_ms = delay
                .parse()
                .map_err(|_| anyhow!("Invalid REPLAY_DELAY_MS value: {}", delay))?;
        }

        Ok(())
    }

    /// Get the rebuild pause as Duration
    pub fn per_day_delay(&self) -> Duration {
        Duration::from_millis(self.replay.per_day_delay_ms)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;

    if config.storage.store_path.as_os_str().is_empty() {
        return Err(anyhow!("Store path cannot be empty"));
    }
    if config.feed.scoreboard_dir.as_os_str().is_empty() {
        return Err(anyhow!("Scoreboard directory cannot be empty"));
    }
    if config.replay.pick_limit == 0 {
        return Err(anyhow!("Pick limit must be greater than 0"));
    }

    Ok(())
}
