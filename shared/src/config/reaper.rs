//! Background refresh-token reaper configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Scheduling for the periodic refresh-token sweeps
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// Whether to run the sweeps at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often to run the sweeps, in seconds
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval_seconds(),
        }
    }
}

impl ReaperConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_or("REAPER_ENABLED", defaults.enabled)?,
            interval_seconds: env_or("REAPER_INTERVAL_SECONDS", defaults.interval_seconds)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "reaper.interval_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_seconds() -> u64 {
    86400 // once a day
}
