//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and token lifetimes
//! - `cache` - In-process access-token verification cache
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `reaper` - Background refresh-token sweeps

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod reaper;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::VerificationCacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use reaper::ReaperConfig;

/// Prefix for environment variables consumed by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "PS";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// JWT and token lifetime configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Verification cache configuration
    #[serde(default)]
    pub cache: VerificationCacheConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Background reaper configuration
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            jwt: JwtConfig::default(),
            cache: VerificationCacheConfig::default(),
            database: DatabaseConfig::default(),
            reaper: ReaperConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/picshare_dev"),
            logging: LoggingConfig::for_environment(Environment::Development),
            ..Default::default()
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            jwt: JwtConfig::new("use-env-variable"),
            database: DatabaseConfig::new("mysql://prod-db:3306/picshare")
                .with_max_connections(50),
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Load configuration from plain environment variables
    ///
    /// Starts from the environment's preset and overrides the JWT, database,
    /// cache and reaper sections from their dedicated variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.jwt = JwtConfig::from_env()?;
        config.database = DatabaseConfig::from_env();
        config.cache = VerificationCacheConfig::from_env()?;
        config.reaper = ReaperConfig::from_env()?;
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load layered configuration
    ///
    /// Layers, lowest priority first: built-in defaults, the optional
    /// `config.<environment>.toml` file, then `PS__SECTION__KEY` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        let loaded: Self = config::Config::builder()
            .add_source(config::File::with_name(env.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("environment", env.to_string())?
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations the token core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.cache.validate()?;
        self.reaper.validate()
    }
}

/// Parse an optional environment variable, falling back to `default` when unset
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_production_preset() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{ "jwt": { "issuer": "picshare-test", "secret": "s3cret" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.jwt.issuer, "picshare-test");
        assert_eq!(config.jwt.access_token_expiry, 900);
        assert!(config.cache.enabled);
    }
}
