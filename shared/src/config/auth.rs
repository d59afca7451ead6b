//! JWT issuance and token lifetime configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Upper bound for every configured lifetime, in seconds
pub const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 86400;

/// JWT authentication configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Shared HMAC secret for signing access tokens
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,

    /// How long an expired refresh token is kept before the reaper deletes it, in seconds
    #[serde(default = "default_deletion_grace")]
    pub refresh_token_deletion_grace: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            secret: default_secret(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            refresh_token_deletion_grace: default_deletion_grace(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("refresh_token_deletion_grace", &self.refresh_token_deletion_grace)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry)?,
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry)?,
            refresh_token_deletion_grace: env_or(
                "JWT_REFRESH_TOKEN_DELETION_GRACE",
                defaults.refresh_token_deletion_grace,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(invalid("jwt.secret", "must not be empty"));
        }
        if self.issuer.is_empty() {
            return Err(invalid("jwt.issuer", "must not be empty"));
        }
        if self.access_token_expiry <= 0 {
            return Err(invalid("jwt.access_token_expiry", "must be positive"));
        }
        if self.refresh_token_expiry <= 0 {
            return Err(invalid("jwt.refresh_token_expiry", "must be positive"));
        }
        if self.refresh_token_deletion_grace < 0 {
            return Err(invalid("jwt.refresh_token_deletion_grace", "must not be negative"));
        }
        for (key, seconds) in [
            ("jwt.access_token_expiry", self.access_token_expiry),
            ("jwt.refresh_token_expiry", self.refresh_token_expiry),
            ("jwt.refresh_token_deletion_grace", self.refresh_token_deletion_grace),
        ] {
            if seconds > MAX_LIFETIME_SECONDS {
                return Err(invalid(key, "must not exceed ten years"));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn default_issuer() -> String {
    String::from("picshare")
}

fn default_secret() -> String {
    String::from(DEFAULT_SECRET)
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    30 * 86400 // 30 days
}

fn default_deletion_grace() -> i64 {
    30 * 86400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 2_592_000);
        assert_eq!(config.issuer, "picshare");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14)
            .with_issuer("picshare-staging");

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1_209_600);
        assert_eq!(config.issuer, "picshare-staging");
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(JwtConfig::new("").validate().is_err());
        assert!(JwtConfig::default().with_access_expiry_minutes(0).validate().is_err());

        let mut config = JwtConfig::default();
        config.refresh_token_deletion_grace = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_lifetimes() {
        let mut config = JwtConfig::default();
        config.access_token_expiry = 10_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref key, .. }) if key == "jwt.access_token_expiry"
        ));

        let mut config = JwtConfig::default();
        config.refresh_token_expiry = MAX_LIFETIME_SECONDS + 1;
        assert!(config.validate().is_err());

        let mut config = JwtConfig::default();
        config.refresh_token_deletion_grace = MAX_LIFETIME_SECONDS;
        assert!(config.validate().is_ok());
    }
}
