//! Access-token verification cache configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// In-process verification cache configuration
///
/// Entry lifetime is not configured here: entries expire together with the
/// access token they describe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationCacheConfig {
    /// Enable the cache; when disabled every verification hits the signer
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Total weight budget in bytes
    #[serde(default = "default_max_weight_bytes")]
    pub max_weight_bytes: u64,
}

impl Default for VerificationCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_weight_bytes: default_max_weight_bytes(),
        }
    }
}

impl VerificationCacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_or("VERIFICATION_CACHE_ENABLED", defaults.enabled)?,
            max_weight_bytes: env_or("VERIFICATION_CACHE_MAX_BYTES", defaults.max_weight_bytes)?,
        })
    }

    /// A configuration that disables caching entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Set the weight budget in megabytes
    pub fn with_max_megabytes(mut self, megabytes: u64) -> Self {
        self.max_weight_bytes = megabytes * 1024 * 1024;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.max_weight_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "cache.max_weight_bytes".to_string(),
                message: "must be positive when the cache is enabled".to_string(),
            });
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_weight_bytes() -> u64 {
    100 * 1024 * 1024 // 100 MB
}
